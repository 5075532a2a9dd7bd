pub mod cursor;
pub mod leaderboard;

pub use cursor::PageCursor;
pub use leaderboard::LeaderboardService;
