use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use store::{Blog, BlogStore, BlogUpdate, NewBlog, NewUser, StoreError, User, UserStore};
use uuid::Uuid;

const BLOG_COLUMNS: &str = "id, title, author, url, likes, important";
const USER_COLUMNS: &str = "id, username, name, password_hash";

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

/// Ids that are not UUIDs cannot name a row.
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

#[derive(Debug, FromRow)]
struct BlogRow {
    id: Uuid,
    title: String,
    author: String,
    url: String,
    likes: i64,
    important: bool,
}

impl From<BlogRow> for Blog {
    fn from(row: BlogRow) -> Self {
        Blog {
            id: row.id.to_string(),
            title: row.title,
            author: row.author,
            url: row.url,
            likes: row.likes,
            important: row.important,
        }
    }
}

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    name: String,
    password_hash: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id.to_string(),
            username: row.username,
            name: row.name,
            password_hash: row.password_hash,
        }
    }
}

/// BlogStore backed by the `blogs` table.
#[derive(Clone, Debug)]
pub struct PgBlogStore {
    pool: PgPool,
}

impl PgBlogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlogStore for PgBlogStore {
    async fn list(&self) -> Result<Vec<Blog>, StoreError> {
        let rows: Vec<BlogRow> = sqlx::query_as(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(Blog::from).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row: Option<BlogRow> =
            sqlx::query_as(&format!("SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(Blog::from))
    }

    async fn insert(&self, blog: NewBlog) -> Result<Blog, StoreError> {
        let row: BlogRow = sqlx::query_as(&format!(
            "INSERT INTO blogs (id, title, author, url, likes, important)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {BLOG_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.important)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.into())
    }

    async fn update(&self, id: &str, update: BlogUpdate) -> Result<Option<Blog>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };

        let mut tx = self.pool.begin().await.map_err(backend)?;

        let row: Option<BlogRow> = sqlx::query_as(&format!(
            "SELECT {BLOG_COLUMNS} FROM blogs WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(backend)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut blog = Blog::from(row);
        blog.apply(&update);

        let row: BlogRow = sqlx::query_as(&format!(
            "UPDATE blogs SET title = $2, author = $3, url = $4, likes = $5, important = $6
             WHERE id = $1
             RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .bind(&blog.title)
        .bind(&blog.author)
        .bind(&blog.url)
        .bind(blog.likes)
        .bind(blog.important)
        .fetch_one(&mut *tx)
        .await
        .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(Some(row.into()))
    }

    async fn delete(&self, id: &str) -> Result<Option<Blog>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row: Option<BlogRow> = sqlx::query_as(&format!(
            "DELETE FROM blogs WHERE id = $1 RETURNING {BLOG_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(Blog::from))
    }
}

/// UserStore backed by the `users` table.
#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(row.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let result: Result<UserRow, sqlx::Error> = sqlx::query_as(&format!(
            "INSERT INTO users (id, username, name, password_hash)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Duplicate("username".to_string()))
            }
            Err(e) => Err(backend(e)),
        }
    }
}
