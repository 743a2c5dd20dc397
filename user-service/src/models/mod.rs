// Domain models
pub mod user;

pub use user::{
    GetUserResponse, ListUsersResponse, MessageResponse, MutationResponse, NewUser, User,
    UserChanges, UserFields,
};
