mod design_repo;
mod user_repo;

pub use design_repo::DesignRepo;
pub use user_repo::UserRepo;
