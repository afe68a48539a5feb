pub mod ids;
pub mod models;
pub mod repo;

mod memory;
pub use memory::{seed_persons, MemoryBlogStore, MemoryPersonStore, MemoryUserStore};

pub use ids::Sequence;
pub use models::{
    Blog, BlogAction, BlogUpdate, NewBlog, NewPerson, NewUser, Person, Session, User, UserInfo,
};
pub use repo::{BlogStore, PersonStore, StoreError, UserStore};
