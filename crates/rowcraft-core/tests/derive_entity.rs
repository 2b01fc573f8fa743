//! Tests for the `#[derive(Entity)]` macro output.
//!
//! These tests verify that the derive macro generates:
//! - table metadata with inferred types, keys and nullability
//! - index and unique groups from column attributes
//! - field access feeding example-based conditions, including references

use chrono::{DateTime, TimeZone, Utc};
use rowcraft_core::dialect::{GenericDialect, MySqlDialect, PostgresDialect, SqliteDialect};
use rowcraft_core::schema::{Entity, MapType, SqlType};
use rowcraft_core::{
    derive_conditions, Error, Registry, SkipReason, SqlValue, Statement, TableOptions,
};
use rowcraft_derive::Entity;

// =============================================================================
// Fixtures
// =============================================================================

#[derive(Debug, Clone, Default, Entity)]
pub struct Author {
    #[column(primary_key, autoincrement)]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
#[table(name = "posts")]
pub struct Post {
    #[column(primary_key, autoincrement)]
    pub id: i64,
    #[column(index)]
    pub title: String,
    #[column(reference, name = "author_id", unique = "author_slug")]
    pub author: Author,
    #[column(unique = "author_slug")]
    pub slug: String,
    pub summary: Option<String>,
    pub created: DateTime<Utc>,
    #[column(skip)]
    pub cache: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct UserAccount {
    #[column(primary_key)]
    pub id: i32,
    pub login: String,
    #[column(write_only)]
    pub password: String,
    #[column(read_only, default = "CURRENT_TIMESTAMP")]
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Label {
    pub text: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Tagging {
    #[column(primary_key)]
    pub id: i64,
    #[column(reference)]
    pub label: Label,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Country {
    #[column(primary_key)]
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct City {
    #[column(primary_key, autoincrement)]
    pub id: i64,
    #[column(reference, name = "country_code")]
    pub country: Country,
    pub name: String,
}

#[derive(Debug, Clone, Default, Entity)]
pub struct Airport {
    #[column(primary_key)]
    pub iata: String,
    #[column(reference, name = "country_code", sql_type = "CHAR(2)")]
    pub country: Country,
}

fn created_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
}

// =============================================================================
// Test: Table metadata
// =============================================================================

#[test]
fn test_default_table_name_is_snake_case() {
    assert_eq!(Author::table().name, "author");
    assert_eq!(UserAccount::table().name, "user_account");
}

#[test]
fn test_table_name_attribute() {
    assert_eq!(Post::table().name, "posts");
}

#[test]
fn test_columns_in_declaration_order() {
    let table = Post::table();
    let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["id", "title", "author_id", "slug", "summary", "created"]
    );
}

#[test]
fn test_skipped_field_is_not_mapped() {
    let table = Post::table();
    assert!(table.get_column("cache").is_none());

    let post = Post {
        cache: "cached".to_string(),
        ..Post::default()
    };
    assert!(post.field_value("cache").is_none());
}

#[test]
fn test_inferred_types() {
    let table = Post::table();
    let ty = |name: &str| table.get_column(name).unwrap().sql_type.clone();

    assert_eq!(ty("id"), SqlType::Bigint);
    assert_eq!(ty("title"), SqlType::Varchar(Some(255)));
    assert_eq!(ty("author_id"), SqlType::Bigint);
    assert_eq!(ty("summary"), SqlType::Varchar(Some(255)));
    assert_eq!(ty("created"), SqlType::Datetime);
    assert_eq!(UserAccount::table().get_column("id").unwrap().sql_type, SqlType::Integer);
}

#[test]
fn test_primary_key_and_nullability() {
    let table = Post::table();

    let pk = table.primary_key().unwrap();
    assert_eq!(pk.name, "id");
    assert!(pk.autoincrement);
    assert!(!pk.nullable);

    assert!(!table.get_column("title").unwrap().nullable);
    assert!(table.get_column("summary").unwrap().nullable);
}

#[test]
fn test_map_type_and_default() {
    let table = UserAccount::table();

    assert_eq!(table.get_column("login").unwrap().map_type, MapType::Both);
    assert_eq!(table.get_column("password").unwrap().map_type, MapType::ToDbOnly);

    let updated = table.get_column("updated").unwrap();
    assert_eq!(updated.map_type, MapType::FromDbOnly);
    assert_eq!(updated.default.as_deref(), Some("CURRENT_TIMESTAMP"));
}

#[test]
fn test_index_and_unique_groups() {
    let table = Post::table();

    assert_eq!(table.indexes.len(), 1);
    assert_eq!(table.indexes[0].name, "title");
    assert_eq!(table.indexes[0].columns, vec!["title".to_string()]);

    assert_eq!(table.uniques.len(), 1);
    assert_eq!(table.uniques[0].name, "author_slug");
    assert_eq!(
        table.uniques[0].columns,
        vec!["author_id".to_string(), "slug".to_string()]
    );
}

#[test]
fn test_describe_matches_table() {
    let post = Post::default();
    assert_eq!(post.describe(), Post::table());
}

// =============================================================================
// Test: Example-based conditions
// =============================================================================

#[test]
fn test_unset_fields_produce_no_conditions() {
    let mut registry = Registry::new();
    let table = Post::table();
    let post = Post::default();

    let conditions = derive_conditions(&mut registry, &GenericDialect::new(), &table, &post).unwrap();

    assert!(conditions.is_empty());
    assert_eq!(conditions.joined(), None);
    assert!(conditions
        .skipped
        .iter()
        .any(|s| s.column == "author_id" && s.reason == SkipReason::UnsetReference));
    assert!(conditions
        .skipped
        .iter()
        .any(|s| s.column == "summary" && s.reason == SkipReason::Unset));
}

#[test]
fn test_reference_binds_primary_key() {
    let mut registry = Registry::new();
    let table = Post::table();
    let post = Post {
        author: Author {
            id: 7,
            name: String::new(),
        },
        ..Post::default()
    };

    let conditions = derive_conditions(&mut registry, &GenericDialect::new(), &table, &post).unwrap();

    assert_eq!(conditions.fragments, vec!["\"author_id\" = ?".to_string()]);
    assert_eq!(conditions.params, vec![SqlValue::Int(7)]);
}

#[test]
fn test_reference_registers_target_on_demand() {
    let mut registry = Registry::new();
    let stmt = Statement::new(GenericDialect::new());
    let post = Post::default();

    assert!(registry.is_empty());
    stmt.get_by_example(&mut registry, &post).unwrap();

    assert!(registry.contains(std::any::TypeId::of::<Post>()));
    assert!(registry.contains(std::any::TypeId::of::<Author>()));
    assert_eq!(registry.len(), 2);
}

#[test]
fn test_reference_without_primary_key_fails() {
    let mut registry = Registry::new();
    let stmt = Statement::new(GenericDialect::new());
    let tagging = Tagging {
        id: 1,
        label: Label {
            text: "rust".to_string(),
        },
    };

    let err = stmt.get_by_example(&mut registry, &tagging).unwrap_err();
    assert_eq!(
        err,
        Error::MissingPrimaryKey {
            table: "label".to_string()
        }
    );
}

#[test]
fn test_reference_binds_text_primary_key() {
    let mut registry = Registry::new();
    let table = City::table();
    let city = City {
        country: Country {
            code: "NZ".to_string(),
            name: String::new(),
        },
        ..City::default()
    };

    let conditions = derive_conditions(&mut registry, &GenericDialect::new(), &table, &city).unwrap();

    assert_eq!(conditions.fragments, vec!["\"country_code\" = ?".to_string()]);
    assert_eq!(conditions.params, vec![SqlValue::Text("NZ".to_string())]);
}

#[test]
fn test_reference_with_empty_text_key_is_skipped() {
    let mut registry = Registry::new();
    let table = City::table();
    let city = City {
        country: Country {
            code: String::new(),
            name: "New Zealand".to_string(),
        },
        name: "Auckland".to_string(),
        ..City::default()
    };

    let conditions = derive_conditions(&mut registry, &GenericDialect::new(), &table, &city).unwrap();

    assert_eq!(conditions.fragments, vec!["\"name\" = ?".to_string()]);
    assert_eq!(conditions.params, vec![SqlValue::Text("Auckland".to_string())]);
    assert!(conditions
        .skipped
        .iter()
        .any(|s| s.column == "country_code" && s.reason == SkipReason::UnsetReference));
}

#[test]
fn test_option_and_timestamp_fields() {
    let mut registry = Registry::new();
    let table = Post::table();
    let post = Post {
        summary: Some("intro".to_string()),
        created: created_at(),
        ..Post::default()
    };

    let conditions = derive_conditions(&mut registry, &GenericDialect::new(), &table, &post).unwrap();

    assert_eq!(
        conditions.fragments,
        vec!["\"summary\" = ?".to_string(), "\"created\" = ?".to_string()]
    );
    assert_eq!(
        conditions.params,
        vec![
            SqlValue::Text("intro".to_string()),
            SqlValue::Timestamp(created_at()),
        ]
    );
}

#[test]
fn test_get_by_example_end_to_end() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(GenericDialect::new());
    stmt.order_by("\"id\" DESC").limit(10, Some(20));

    let post = Post {
        title: "hello".to_string(),
        author: Author {
            id: 3,
            name: "ann".to_string(),
        },
        ..Post::default()
    };

    let (sql, params) = stmt.get_by_example(&mut registry, &post).unwrap();
    assert_eq!(
        sql,
        "SELECT \"posts\".\"id\", \"posts\".\"title\", \"posts\".\"author_id\", \
         \"posts\".\"slug\", \"posts\".\"summary\", \"posts\".\"created\" FROM \"posts\" \
         WHERE \"title\" = ? and \"author_id\" = ? ORDER BY \"id\" DESC LIMIT 10 OFFSET 20"
    );
    assert_eq!(
        params,
        vec![SqlValue::Text("hello".to_string()), SqlValue::Int(3)]
    );
}

#[test]
fn test_write_only_column_left_out_of_projection() {
    let mut registry = Registry::new();
    let stmt = Statement::new(SqliteDialect::new());
    let account = UserAccount {
        login: "root".to_string(),
        ..UserAccount::default()
    };

    let (sql, params) = stmt.get_by_example(&mut registry, &account).unwrap();
    assert_eq!(
        sql,
        "SELECT \"user_account\".\"id\", \"user_account\".\"login\", \
         \"user_account\".\"updated\" FROM \"user_account\" WHERE \"login\" = ?"
    );
    assert_eq!(params, vec![SqlValue::Text("root".to_string())]);
}

#[test]
fn test_count_by_example_with_explicit_where() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(MySqlDialect::new());
    stmt.where_clause("`id` > ?", vec![SqlValue::Int(100)]);

    let author = Author {
        id: 0,
        name: "ann".to_string(),
    };

    let (sql, params) = stmt.count_by_example(&mut registry, &author).unwrap();
    assert_eq!(
        sql,
        "SELECT count(*) as `total` FROM `author` WHERE `id` > ? and `name` = ?"
    );
    assert_eq!(
        params,
        vec![SqlValue::Int(100), SqlValue::Text("ann".to_string())]
    );
}

// =============================================================================
// Test: DDL from derived metadata
// =============================================================================

#[test]
fn test_create_table_generic() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(GenericDialect::new());
    stmt.with_table(registry.register::<Author>());

    assert_eq!(
        stmt.create_table_sql().unwrap(),
        "CREATE TABLE IF NOT EXISTS \"author\" (\"id\" BIGINT PRIMARY KEY, \"name\" VARCHAR(255) NOT NULL);"
    );
}

#[test]
fn test_create_table_mysql_with_options() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(MySqlDialect::new());
    stmt.with_table(registry.register::<Author>())
        .store_engine("InnoDB")
        .charset("utf8");

    assert_eq!(
        stmt.create_table_sql().unwrap(),
        "CREATE TABLE IF NOT EXISTS `author` (`id` BIGINT PRIMARY KEY AUTO_INCREMENT, \
         `name` VARCHAR(255) NOT NULL) ENGINE=InnoDB DEFAULT CHARSET utf8;"
    );
}

#[test]
fn test_create_table_postgres_ignores_options() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(PostgresDialect::new());
    stmt.with_table(registry.register::<Author>()).charset("utf8");

    assert_eq!(
        stmt.create_table_sql().unwrap(),
        "CREATE TABLE IF NOT EXISTS \"author\" (\"id\" BIGSERIAL PRIMARY KEY, \"name\" VARCHAR(255) NOT NULL);"
    );
}

#[test]
fn test_create_table_sqlite_with_default() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(SqliteDialect::new());
    stmt.with_table(registry.register::<UserAccount>());

    assert_eq!(
        stmt.create_table_sql().unwrap(),
        "CREATE TABLE IF NOT EXISTS \"user_account\" (\"id\" INTEGER PRIMARY KEY, \
         \"login\" TEXT NOT NULL, \"password\" TEXT NOT NULL, \
         \"updated\" TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP);"
    );
}

#[test]
fn test_reference_column_takes_key_type() {
    assert_eq!(
        City::table().get_column("country_code").unwrap().sql_type,
        SqlType::Varchar(Some(255))
    );
    assert_eq!(
        Airport::table().get_column("country_code").unwrap().sql_type,
        SqlType::Custom("CHAR(2)".to_string())
    );

    let mut registry = Registry::new();
    let mut stmt = Statement::new(SqliteDialect::new());
    stmt.with_table(registry.register::<City>());
    assert_eq!(
        stmt.create_table_sql().unwrap(),
        "CREATE TABLE IF NOT EXISTS \"city\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
         \"country_code\" TEXT NOT NULL, \"name\" TEXT NOT NULL);"
    );
}

#[test]
fn test_index_statements() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(GenericDialect::new());
    stmt.with_table(registry.register::<Post>());

    assert_eq!(
        stmt.create_index_sqls().unwrap(),
        vec!["CREATE INDEX IDX_posts_title ON posts (title);".to_string()]
    );
    assert_eq!(
        stmt.create_unique_sqls().unwrap(),
        vec!["CREATE UNIQUE INDEX UQE_posts_author_slug ON posts (author_id,slug);".to_string()]
    );
    assert_eq!(
        stmt.drop_table_sql().unwrap(),
        "DROP TABLE IF EXISTS \"posts\";"
    );
}

#[test]
fn test_table_override_applies_to_ddl() {
    let mut registry = Registry::new();
    let mut stmt = Statement::new(GenericDialect::new());
    stmt.with_table(registry.register::<Post>()).table("posts_archive");

    assert_eq!(
        stmt.drop_table_sql().unwrap(),
        "DROP TABLE IF EXISTS \"posts_archive\";"
    );
    assert_eq!(
        stmt.create_index_sqls().unwrap(),
        vec!["CREATE INDEX IDX_posts_archive_title ON posts_archive (title);".to_string()]
    );
}

// =============================================================================
// Test: Table options from configuration
// =============================================================================

#[test]
fn test_table_options_from_json() {
    let options: TableOptions =
        serde_json::from_str(r#"{"store_engine": "InnoDB", "charset": "utf8mb4"}"#).unwrap();
    assert_eq!(
        options,
        TableOptions::default().store_engine("InnoDB").charset("utf8mb4")
    );

    let partial: TableOptions = serde_json::from_str(r#"{"charset": "utf8"}"#).unwrap();
    assert_eq!(partial.store_engine, None);
    assert_eq!(partial.charset.as_deref(), Some("utf8"));

    let mut registry = Registry::new();
    let mut stmt = Statement::new(MySqlDialect::new());
    stmt.with_table(registry.register::<Author>()).options(partial);

    assert!(stmt
        .create_table_sql()
        .unwrap()
        .ends_with(") DEFAULT CHARSET utf8;"));
}
