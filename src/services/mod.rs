// External collaborators: build scripts, artifact storage, team chat

pub mod build;
pub mod notify;
pub mod storage;
