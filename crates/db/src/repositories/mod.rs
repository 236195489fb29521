//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Plain CRUD takes `&PgPool`; methods that must run inside a caller's
//! transaction take `&mut PgConnection` (pass `&mut *tx`).

pub mod actor_repo;
pub mod booking_repo;
pub mod cinema_repo;
pub mod film_repo;
pub mod film_translation_repo;
pub mod hall_repo;
pub mod movie_session_repo;
pub mod refresh_token_repo;
pub mod user_repo;
pub mod vote_repo;

pub use actor_repo::ActorRepo;
pub use booking_repo::BookingRepo;
pub use cinema_repo::CinemaRepo;
pub use film_repo::FilmRepo;
pub use film_translation_repo::FilmTranslationRepo;
pub use hall_repo::HallRepo;
pub use movie_session_repo::MovieSessionRepo;
pub use refresh_token_repo::RefreshTokenRepo;
pub use user_repo::UserRepo;
pub use vote_repo::VoteRepo;
