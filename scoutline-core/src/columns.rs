//! Well-known column names shared by the feature and reference tables.
//!
//! The preprocessing pipeline emits scaled feature columns alongside
//! `<name>_orig` mirrors carrying the original-scale values. The constants
//! here name the columns the engine reads directly; everything else is
//! resolved dynamically through [`crate::FeatureCatalogue`].

/// Original-scale player age in the reference table.
pub const AGE_ORIG: &str = "age_orig";
/// Scaled age feature in the feature table.
pub const AGE: &str = "age";
/// Gender column in the reference table.
pub const GENDER: &str = "gender";
/// Coarse position bucket (`G`, `D`, `F`) in the reference table.
pub const POSITION_GROUP: &str = "position_group";

/// Prefix of the one-hot position indicator columns.
pub const POSITION_PREFIX: &str = "pos_";
/// Prefix of the one-hot gender indicator columns.
pub const GENDER_PREFIX: &str = "gender_";
/// One-hot indicator for the men's population.
pub const GENDER_MEN: &str = "gender_MEN";
/// Suffix of the original-scale mirror columns in the reference table.
pub const ORIG_SUFFIX: &str = "_orig";

/// Scaled days-since-last-game feature, inversely related to staleness.
pub const GAME_FRESHNESS: &str = "game_freshness";
/// Scaled recent adjusted save percentage (goaltenders).
pub const RECENT_ADJ_SAVE_PCT: &str = "recent_adj_save_pct";
/// Scaled season adjusted save percentage fallback (goaltenders).
pub const ADJ_SEASON_SVP: &str = "adj_season_svp";
/// Scaled recent adjusted points per game (skaters).
pub const RECENT_ADJ_P_PER_GP: &str = "recent_adj_P_per_GP";
/// Scaled season adjusted points-per-game fallback (skaters).
pub const ADJ_SEASON_POINTS_PER_GAME: &str = "adj_season_pointsPerGame";

/// Display name column in the reference table.
pub const NAME: &str = "name";
/// Original listed position (for example `LW`, `RD`).
pub const POSITION_ORIG: &str = "position_orig";
/// Player nationality.
pub const NATIONALITY_ORIG: &str = "nationality_orig";
/// Season games played.
pub const SEASON_GAMES_PLAYED: &str = "season_gamesPlayed_orig";
/// Season goals.
pub const SEASON_GOALS: &str = "season_goals_orig";
/// Season assists.
pub const SEASON_ASSISTS: &str = "season_assists_orig";
/// Season points.
pub const SEASON_POINTS: &str = "season_points_orig";
/// Season points per game.
pub const SEASON_POINTS_PER_GAME: &str = "season_pointsPerGame_orig";
/// Season goals-against average.
pub const SEASON_GAA: &str = "season_gaa_orig";
/// Season save percentage.
pub const SEASON_SVP: &str = "season_svp_orig";
/// Season shutouts. The reference table carries this column unmirrored.
pub const SEASON_SHUTOUTS: &str = "season_shutouts";
/// Recent-window games played.
pub const RECENT_GP: &str = "recent_GP";
/// Recent-window goals.
pub const RECENT_G: &str = "recent_G";
/// Recent-window assists.
pub const RECENT_A: &str = "recent_A";
/// Recent-window total points.
pub const RECENT_TP: &str = "recent_TP";
/// Recent-window penalty minutes.
pub const RECENT_PIM: &str = "recent_PIM";
/// Recent-window plus/minus.
pub const RECENT_PLUS_MINUS: &str = "recent_plus_minus";
/// Recent-window saves.
pub const RECENT_SAVES: &str = "recent_saves";
/// Recent-window shots against.
pub const RECENT_SHOTS_AGAINST: &str = "recent_shots_against";
/// Original-scale recent adjusted points per game.
pub const RECENT_ADJ_P_PER_GP_ORIG: &str = "recent_adj_P_per_GP_orig";
/// Original-scale recent adjusted save percentage.
pub const RECENT_ADJ_SAVE_PCT_ORIG: &str = "recent_adj_save_pct_orig";
/// Days since the player's last recorded game.
pub const DAYS_SINCE_LAST_GAME: &str = "days_since_last_game";
