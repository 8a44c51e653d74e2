use std::fmt;

use optf::{OptionError, OptionTable};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default)]
struct Settings {
    host: String,
    username: String,
    password: String,
    port: u16,
}

trait Database: fmt::Display {
    fn settings_mut(&mut self) -> &mut Settings;
}

struct MySql(Settings);
struct PostgreSql(Settings);

impl MySql {
    fn new() -> Self {
        MySql(Settings {
            port: 3306,
            ..Settings::default()
        })
    }
}

impl PostgreSql {
    fn new() -> Self {
        PostgreSql(Settings {
            port: 5432,
            ..Settings::default()
        })
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Host: {}", self.host)?;
        writeln!(f, "Username: {}", self.username)?;
        writeln!(f, "Password: {}", self.password)?;
        writeln!(f, "Port: {}", self.port)
    }
}

impl fmt::Display for MySql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " MySQL ")?;
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for PostgreSql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, " PostgreSQL ")?;
        write!(f, "{}", self.0)
    }
}

impl Database for MySql {
    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.0
    }
}

impl Database for PostgreSql {
    fn settings_mut(&mut self) -> &mut Settings {
        &mut self.0
    }
}

// Anything that can be built from the raw option text.
#[derive(Debug, Default)]
struct AnyObject(String);

impl From<&str> for AnyObject {
    fn from(s: &str) -> Self {
        AnyObject(s.to_string())
    }
}

#[derive(Default)]
struct DatabaseConnector {
    dbtype: Option<Box<dyn Database>>,
    pconnect: bool,
    any: AnyObject,
}

fn set_db_type(db: &str) -> Option<Box<dyn Database>> {
    if db == "mysql" {
        Some(Box::new(MySql::new()))
    } else {
        Some(Box::new(PostgreSql::new()))
    }
}

fn settings(c: &mut DatabaseConnector) -> Option<&mut Settings> {
    c.dbtype.as_mut().map(|db| db.settings_mut())
}

impl DatabaseConnector {
    fn new<I>(options: I) -> Result<Self, OptionError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let table = OptionTable::new()
            .transform("dbtype", |c: &mut Self| &mut c.dbtype, set_db_type)
            .define("pconnect", |c: &mut Self| &mut c.pconnect)
            .define_via("username", |c: &mut Self| settings(c).map(|s| &mut s.username))
            .define_via("password", |c: &mut Self| settings(c).map(|s| &mut s.password))
            .define_via("port", |c: &mut Self| settings(c).map(|s| &mut s.port))
            .define_via("host", |c: &mut Self| settings(c).map(|s| &mut s.host))
            .object("any", |c: &mut Self| &mut c.any);

        let mut this = DatabaseConnector::default();
        let report = table.load(&mut this, options)?;
        for token in report.skipped() {
            tracing::warn!(token = token.as_str(), "ignored malformed option");
        }
        Ok(this)
    }

    fn print(&self) {
        if let Some(db) = &self.dbtype {
            print!("{}", db);
        }
        println!("Pconnect: {}", self.pconnect);
        println!("object: {}", self.any.0);
    }
}

fn main() -> Result<(), OptionError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mc = DatabaseConnector::new([
        "dbtype=postgresql",
        "username=root",
        "host=localhost",
        "pconnect=true",
        "any=ANY OBJECT",
        "password=mypass",
        "port=1234",
    ])?;
    mc.print();
    Ok(())
}
