use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::ids::{new_uuid, Sequence};
use crate::models::{Blog, BlogUpdate, NewBlog, NewPerson, NewUser, Person, User};
use crate::repo::{BlogStore, PersonStore, StoreError, UserStore};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    mutex
        .lock()
        .map_err(|e| StoreError::Backend(format!("poisoned lock: {e}")))
}

/// The six entries the phonebook starts with.
pub fn seed_persons() -> Vec<Person> {
    [
        (1, "Arto Hellas", "040-123456"),
        (2, "Ada Lovelace", "39-44-5323523"),
        (3, "Dan Abramov", "12-43-234345"),
        (4, "Mary Poppendieck", "39-23-6423122"),
        (5, "Luka Poppendieck", "33-23-6423122"),
        (6, "Lena Poppendieck", "33-23-6423882"),
    ]
    .into_iter()
    .map(|(id, name, number)| Person {
        id,
        name: name.to_string(),
        number: number.to_string(),
    })
    .collect()
}

/// In-memory BlogStore for tests and for running without a database.
#[derive(Clone, Debug, Default)]
pub struct MemoryBlogStore {
    blogs: Arc<Mutex<Vec<Blog>>>,
}

impl MemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(lock(&self.blogs)?.clone())
    }

    async fn get(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        Ok(lock(&self.blogs)?.iter().find(|b| b.id == id).cloned())
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let blog = blog.into_blog(new_uuid());
        lock(&self.blogs)?.push(blog.clone());
        Ok(blog)
    }

    async fn update(&self, id: &str, update: BlogUpdate) -> Result<Option<Blog>, StoreError> {
        let mut blogs = lock(&self.blogs)?;
        let Some(blog) = blogs.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };
        blog.apply(&update);
        Ok(Some(blog.clone()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let mut blogs = lock(&self.blogs)?;
        Ok(blogs
            .iter()
            .position(|b| b.id == id)
            .map(|index| blogs.remove(index)))
    }
}

/// In-memory PersonStore. Ids come from a [`Sequence`] and are never reused.
#[derive(Clone, Debug)]
pub struct MemoryPersonStore {
    persons: Arc<Mutex<Vec<Person>>>,
    ids: Arc<Sequence>,
}

impl MemoryPersonStore {
    /// Empty phonebook.
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    /// Phonebook holding [`seed_persons`].
    pub fn seeded() -> Self {
        Self::with_entries(seed_persons())
    }

    pub fn with_entries(persons: Vec<Person>) -> Self {
        let last = persons.iter().map(|p| p.id).max().unwrap_or(0);
        Self {
            persons: Arc::new(Mutex::new(persons)),
            ids: Arc::new(Sequence::starting_after(last)),
        }
    }
}

impl Default for MemoryPersonStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn list(&self) -> Result<Vec<Person>, StoreError> {
        Ok(lock(&self.persons)?.clone())
    }

    async fn get(&self, id: u64) -> Result<Option<Person>, StoreError> {
        Ok(lock(&self.persons)?.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, person: NewPerson) -> Result<Person, StoreError> {
        let mut persons = lock(&self.persons)?;
        if persons.iter().any(|p| p.name == person.name) {
            return Err(StoreError::Duplicate("Name".to_string()));
        }
        let person = Person {
            id: self.ids.next_id(),
            name: person.name,
            number: person.number,
        };
        persons.push(person.clone());
        Ok(person)
    }

    async fn delete(&self, id: u64) -> Result<Option<Person>, StoreError> {
        let mut persons = lock(&self.persons)?;
        Ok(persons
            .iter()
            .position(|p| p.id == id)
            .map(|index| persons.remove(index)))
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(lock(&self.persons)?.len())
    }
}

/// In-memory UserStore.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    users: Arc<Mutex<Vec<User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(lock(&self.users)?.clone())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(lock(&self.users)?
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = lock(&self.users)?;
        if users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username".to_string()));
        }
        let user = User {
            id: new_uuid(),
            username: user.username,
            name: user.name,
            password_hash: user.password_hash,
        };
        users.push(user.clone());
        Ok(user)
    }
}
