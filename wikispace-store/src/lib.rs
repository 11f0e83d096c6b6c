//! Record store for the wiki hosting platform.
//!
//! A thin layer over SQLite holding users and tiddlers. The web handlers in
//! the `wikispace` crate only read from the store; writes exist for seeding
//! and for the platform's editing surfaces, which live elsewhere.

use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::TimeZone;
use chrono::Utc;
use rusqlite::Connection;
use rusqlite::params;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no user {0}")]
    NoUser(String),
    #[error("no tiddler {title} in bag {bag}")]
    NoTiddler { bag: String, title: String },
    #[error("unknown search field: {0}")]
    BadQuery(String),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

pub trait SqliteDateTime {
    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";
    fn from_sqlite(text: &str) -> Self;
    fn to_sqlite(&self) -> String;
}

impl SqliteDateTime for DateTime<Utc> {
    fn from_sqlite(text: &str) -> Self {
        let s = text.trim().to_string();
        let naive = NaiveDateTime::parse_from_str(&s, Self::FORMAT).unwrap();
        Utc::from_utc_datetime(&Utc, &naive)
    }
    fn to_sqlite(&self) -> String {
        self.format(Self::FORMAT).to_string()
    }
}

#[test]
fn test_sqlite_datetime() {
    let dt = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let text = dt.to_sqlite();
    let dt2 = chrono::DateTime::from_sqlite(&text);
    assert_eq!(dt, dt2);
}

/// A platform account.
#[derive(Clone, Debug)]
pub struct User {
    pub username: String,
    pub created: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn create_table(conn: &Connection) -> Result<usize, rusqlite::Error> {
        let stmt = "
            CREATE TABLE IF NOT EXISTS users (
                username TEXT PRIMARY KEY,
                created DATETIME NOT NULL
            );
        ";
        conn.execute(stmt, [])
    }
    pub fn put(conn: &Connection, username: &str, created: DateTime<Utc>) -> Result<(), StoreError> {
        let stmt = "
            INSERT OR REPLACE INTO users (username, created) VALUES (?, ?);
        ";
        conn.execute(stmt, params![username, created.to_sqlite()])?;
        Ok(())
    }
    pub fn get(conn: &Connection, username: &str) -> Result<User, StoreError> {
        let stmt = "SELECT username, created FROM users WHERE username = ?";
        conn.prepare(stmt)
            .map_err(StoreError::Database)?
            .query_row([username], |row| {
                let created_str: String = row.get("created")?;
                Ok(User {
                    username: row.get("username")?,
                    created: DateTime::from_sqlite(&created_str),
                })
            })
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NoUser(username.to_string()),
                err => StoreError::Database(err),
            })
    }
}

#[test]
fn test_user() {
    let conn = Connection::open_in_memory().unwrap();
    init(&conn);
    let created = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    User::put(&conn, "alice", created).unwrap();
    let user = User::get(&conn, "alice").unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.created, created);
    let missing = User::get(&conn, "carol");
    assert!(matches!(missing, Err(StoreError::NoUser(_))));
}

/// A content record inside a named bag.
#[derive(Clone, Debug)]
pub struct Tiddler {
    /// The bag (container) the tiddler belongs to.
    pub bag: String,
    pub title: String,
    /// Wikitext body.
    pub text: String,
    /// Username of the last editor.
    pub modifier: String,
    pub modified: chrono::DateTime<chrono::Utc>,
}

fn row_to_tiddler(row: &rusqlite::Row) -> Result<Tiddler, rusqlite::Error> {
    let modified_str: String = row.get("modified")?;
    Ok(Tiddler {
        bag: row.get("bag")?,
        title: row.get("title")?,
        text: row.get("text")?,
        modifier: row.get("modifier")?,
        modified: DateTime::from_sqlite(&modified_str),
    })
}

impl Tiddler {
    pub fn create_table(conn: &Connection) -> Result<usize, rusqlite::Error> {
        let stmt = "
            CREATE TABLE IF NOT EXISTS tiddlers (
                bag TEXT NOT NULL,
                title TEXT NOT NULL,
                text TEXT NOT NULL,
                modifier TEXT NOT NULL,
                modified DATETIME NOT NULL,
                PRIMARY KEY (bag, title)
            );
        ";
        conn.execute(stmt, [])
    }
    pub fn put(conn: &Connection, tiddler: &Tiddler) -> Result<(), StoreError> {
        let stmt = "
            INSERT OR REPLACE INTO tiddlers (bag, title, text, modifier, modified)
            VALUES (?, ?, ?, ?, ?);
        ";
        conn.execute(
            stmt,
            params![
                tiddler.bag,
                tiddler.title,
                tiddler.text,
                tiddler.modifier,
                tiddler.modified.to_sqlite()
            ],
        )?;
        Ok(())
    }
    pub fn get(conn: &Connection, bag: &str, title: &str) -> Result<Tiddler, StoreError> {
        let stmt = "
            SELECT bag, title, text, modifier, modified
            FROM tiddlers WHERE bag = ? AND title = ?;
        ";
        conn.prepare(stmt)
            .map_err(StoreError::Database)?
            .query_row([bag, title], row_to_tiddler)
            .map_err(|err| match err {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NoTiddler {
                    bag: bag.to_string(),
                    title: title.to_string(),
                },
                err => StoreError::Database(err),
            })
    }
    /// Run a `field:value` search query.
    ///
    /// Supported fields are `modifier`, `bag`, and `title`. A query without a
    /// field searches the tiddler text. Result order is unspecified; callers
    /// sort via the filter utility.
    pub fn search(conn: &Connection, query: &str) -> Result<Vec<Tiddler>, StoreError> {
        let select = "SELECT bag, title, text, modifier, modified FROM tiddlers";
        let (stmt, param) = match query.split_once(':') {
            Some(("modifier", value)) => (format!("{select} WHERE modifier = ?"), value.to_string()),
            Some(("bag", value)) => (format!("{select} WHERE bag = ?"), value.to_string()),
            Some(("title", value)) => (format!("{select} WHERE title = ?"), value.to_string()),
            Some((field, _)) => return Err(StoreError::BadQuery(field.to_string())),
            None => (format!("{select} WHERE text LIKE ?"), format!("%{query}%")),
        };
        let tiddlers = conn
            .prepare(&stmt)?
            .query_map([param], row_to_tiddler)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(tiddlers)
    }
}

#[test]
fn test_tiddler() {
    let conn = Connection::open_in_memory().unwrap();
    init(&conn);
    let tiddler = Tiddler {
        bag: "alice_public".to_string(),
        title: "profile".to_string(),
        text: "# Alice".to_string(),
        modifier: "alice".to_string(),
        modified: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
    };
    Tiddler::put(&conn, &tiddler).unwrap();
    let stored = Tiddler::get(&conn, "alice_public", "profile").unwrap();
    assert_eq!(stored.text, "# Alice");
    assert_eq!(stored.modified, tiddler.modified);

    let missing = Tiddler::get(&conn, "bob_public", "profile");
    let msg = missing.err().unwrap().to_string();
    assert!(msg.contains("bob_public"));
    assert!(msg.contains("profile"));
}

#[test]
fn test_search() {
    let conn = Connection::open_in_memory().unwrap();
    init(&conn);
    let base = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    for (title, modifier) in [("One", "alice"), ("Two", "alice"), ("Three", "bob")] {
        let tiddler = Tiddler {
            bag: "wiki_public".to_string(),
            title: title.to_string(),
            text: format!("text of {title}"),
            modifier: modifier.to_string(),
            modified: base,
        };
        Tiddler::put(&conn, &tiddler).unwrap();
    }
    let by_alice = Tiddler::search(&conn, "modifier:alice").unwrap();
    assert_eq!(by_alice.len(), 2);
    let by_text = Tiddler::search(&conn, "of Three").unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].modifier, "bob");
    let bad = Tiddler::search(&conn, "owner:alice");
    assert!(matches!(bad, Err(StoreError::BadQuery(_))));
}

/// Create the store tables if they do not exist yet.
pub fn init(conn: &Connection) {
    User::create_table(conn).expect("Failed to create users table");
    Tiddler::create_table(conn).expect("Failed to create tiddlers table");
}
