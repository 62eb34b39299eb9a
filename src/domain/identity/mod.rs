//! Identity domain - registered users and their profiles.

mod user;

pub use user::{
    validate_password, NewUser, ProfileUpdate, User, UserProfile, MIN_PASSWORD_LENGTH,
};
