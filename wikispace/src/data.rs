use crate::ServeArgs;
use chrono::Duration;
use chrono::Utc;
use indoc::indoc;
use rusqlite::Connection;
use rusqlite::Result;
use wikispace_store::Tiddler;
use wikispace_store::User;

pub fn connect(args: &ServeArgs) -> Result<Connection> {
    let conn = if args.production {
        let path = &args.database_path;
        Connection::open(path)?
    } else {
        Connection::open_in_memory()?
    };
    Ok(conn)
}

/// Seed a demo space so the dev server and the tests have content.
fn init_data(args: &ServeArgs, conn: &Connection) {
    if args.production {
        return;
    }
    let now = Utc::now();
    User::put(conn, "alice", now).unwrap();
    User::put(conn, "bob", now).unwrap();

    let profile_text = indoc! {"
        # Alice

        Lorem ipsum dolor sit amet, consectetur adipiscing elit. I keep my
        notes in [my space](/bags/alice_public/tiddlers/Note%2001).
    "};
    let profile = Tiddler {
        bag: "alice_public".to_string(),
        title: "profile".to_string(),
        text: profile_text.to_string(),
        modifier: "alice".to_string(),
        modified: now,
    };
    Tiddler::put(conn, &profile).unwrap();

    // More notes than the activity listing shows, so the limit is visible.
    for i in 1..=25i64 {
        let note = Tiddler {
            bag: "alice_public".to_string(),
            title: format!("Note {i:02}"),
            text: format!("Ut enim ad minim veniam, note number {i}."),
            modifier: "alice".to_string(),
            modified: now - Duration::minutes(i),
        };
        Tiddler::put(conn, &note).unwrap();
    }

    // Bob has activity but no profile tiddler yet.
    let scratch = Tiddler {
        bag: "bob_public".to_string(),
        title: "Scratch".to_string(),
        text: "Duis aute irure dolor in reprehenderit.".to_string(),
        modifier: "bob".to_string(),
        modified: now - Duration::minutes(5),
    };
    Tiddler::put(conn, &scratch).unwrap();
}

pub fn init(args: &ServeArgs, conn: &Connection) {
    wikispace_store::init(conn);
    init_data(args, conn);
}
