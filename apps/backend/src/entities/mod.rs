pub mod hole_scores;
pub mod holes;
pub mod match_players;
pub mod matches;
pub mod users;

pub use hole_scores::Entity as HoleScores;
pub use hole_scores::Model as HoleScore;
pub use holes::Entity as Holes;
pub use holes::Model as Hole;
pub use match_players::Entity as MatchPlayers;
pub use match_players::Model as MatchPlayer;
pub use matches::Entity as Matches;
pub use matches::Model as Match;
pub use users::Entity as Users;
pub use users::Model as User;
