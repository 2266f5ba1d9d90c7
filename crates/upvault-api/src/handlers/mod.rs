pub mod credential;
pub mod health;
pub mod local_store;
pub mod object_delete;
