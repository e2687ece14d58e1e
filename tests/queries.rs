//! End-to-end query scenarios through `Database::transact`.

use std::fs;

use minirel::{Database, DatabaseConfig};
use tempfile::{TempDir, tempdir};

fn database_in(dir: &TempDir) -> Database {
    Database::with_config(DatabaseConfig {
        data_directory: dir.path().to_path_buf(),
        ..DatabaseConfig::default()
    })
}

fn teams_and_fans() -> (TempDir, Database) {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("fans.tbl"),
        "Lastname string,Firstname string,TeamName string\n\
         'Lee','Maurice','Mets'\n\
         'Lee','Mo','Mets'\n\
         'Ray','Mitas','Patriots'\n\
         'Hwang','Alex','Cloud9'\n\
         'Rulison','Tyler','Cloud9'\n\
         'Kim','Jackie','Mets'\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("teams.tbl"),
        "TeamName string,City string,Sport string,YearEstablished int\n\
         'Mets','New York','MLB Baseball',1962\n\
         'Patriots','New England','NFL Football',1960\n\
         'Cloud9','Los Angeles','eSports',2012\n",
    )
    .unwrap();

    let mut db = database_in(&dir);
    assert_eq!(db.transact("load fans"), "");
    assert_eq!(db.transact("load teams"), "");
    (dir, db)
}

#[test]
fn test_novalue_is_identity_for_addition() {
    let mut db = Database::new();
    assert_eq!(db.transact("create table T1 (x int, y int)"), "");
    assert_eq!(db.transact("insert into T1 values 7, NOVALUE"), "");
    assert_eq!(db.transact("select x + y as z from T1"), "z int\n7");
}

#[test]
fn test_filter_preserves_row_order() {
    let (_dir, mut db) = teams_and_fans();

    assert_eq!(
        db.transact("select Firstname,Lastname from fans where Lastname >= 'Lee'"),
        "Firstname string,Lastname string\n\
         'Maurice','Lee'\n\
         'Mo','Lee'\n\
         'Mitas','Ray'\n\
         'Tyler','Rulison'"
    );
}

#[test]
fn test_join_on_shared_column() {
    let (_dir, mut db) = teams_and_fans();

    assert_eq!(
        db.transact("select Firstname, City from fans, teams where YearEstablished > 1961"),
        "ERROR: Cannot find column YearEstablished"
    );
    assert_eq!(
        db.transact(
            "select Firstname, City, YearEstablished from fans, teams where YearEstablished > 1961"
        ),
        "Firstname string,City string,YearEstablished int\n\
         'Maurice','New York',1962\n\
         'Mo','New York',1962\n\
         'Alex','Los Angeles',2012\n\
         'Tyler','Los Angeles',2012\n\
         'Jackie','New York',1962"
    );
}

#[test]
fn test_join_moves_shared_columns_first() {
    let (_dir, mut db) = teams_and_fans();

    let joined = db.transact("select * from fans, teams where Lastname == 'Ray'");
    assert_eq!(
        joined,
        "TeamName string,Lastname string,Firstname string,City string,Sport string,YearEstablished int\n\
         'Patriots','Ray','Mitas','New England','NFL Football',1960"
    );
}

#[test]
fn test_malformed_select_changes_nothing() {
    let (_dir, mut db) = teams_and_fans();
    let before = db.transact("print fans");

    let result = db.transact("select * wher x > 1");
    assert!(result.starts_with("Malformed select:"), "{result}");
    assert_eq!(result, "Malformed select: * wher x > 1");

    assert_eq!(db.transact("print fans"), before);
}

#[test]
fn test_whitespace_is_collapsed() {
    let mut db = Database::new();
    assert_eq!(db.transact("  create   table\tt  (x   int ,y  float)  "), "");
    assert_eq!(db.transact("insert into t values   1 ,   2.0"), "");
    assert_eq!(db.transact("select   x,y   from   t"), "x int,y float\n1,2.000");
}

#[test]
fn test_unknown_command() {
    let mut db = Database::new();
    assert_eq!(db.transact("delete from t"), "Malformed query: delete from t");
}

#[test]
fn test_store_then_load_round_trip() {
    let dir = tempdir().unwrap();
    let mut db = database_in(&dir);

    db.transact("create table records (team string, wins int, pct float)");
    db.transact("insert into records values 'Mets', 90, 0.556");
    db.transact("insert into records values 'Cubs', NOVALUE, NaN");
    let rendered = db.transact("print records");

    assert_eq!(db.transact("store records"), "");
    assert_eq!(db.transact("drop table records"), "");
    assert_eq!(db.transact("load records"), "");
    assert_eq!(db.transact("print records"), rendered);
}

#[test]
fn test_load_errors() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("empty.tbl"), "").unwrap();
    let mut db = database_in(&dir);

    assert_eq!(db.transact("load missing"), "ERROR: Cannot open file missing.tbl");
    assert_eq!(db.transact("load empty"), "ERROR: Unable to parse file empty.tbl");
    assert_eq!(db.transact("store missing"), "ERROR: No such table missing");
}

#[test]
fn test_create_from_select_and_reuse() {
    let (_dir, mut db) = teams_and_fans();

    assert_eq!(
        db.transact("create table mets as select Firstname, TeamName from fans where TeamName == 'Mets'"),
        ""
    );
    assert_eq!(
        db.transact("select Firstname, City from mets, teams"),
        "Firstname string,City string\n'Maurice','New York'\n'Mo','New York'\n'Jackie','New York'"
    );
}

#[test]
fn test_arithmetic_errors_surface_as_text() {
    let mut db = Database::new();
    db.transact("create table t (name string, n int)");
    db.transact("insert into t values 'a', 1");

    assert_eq!(
        db.transact("select name + n as x from t"),
        "ERROR: Invalid type combination string and int"
    );
    assert_eq!(
        db.transact("select name - name as x from t"),
        "ERROR: Arithmetic Error: Cannot subtract strings"
    );
    assert_eq!(
        db.transact("select * from t where name > 1"),
        "ERROR: Incomparable string>int"
    );
    assert_eq!(
        db.transact("select * from t where n > Lee"),
        "ERROR: Cannot determine type Lee"
    );
}

#[test]
fn test_division_by_zero_is_nan() {
    let mut db = Database::new();
    db.transact("create table t (a int, b float)");
    db.transact("insert into t values 1, 0.0");
    db.transact("insert into t values 0, 2.0");

    assert_eq!(
        db.transact("select a / 0 as q, b / 0.0 as r from t"),
        "q int,r float\nNaN,NaN\nNaN,NaN"
    );
    assert_eq!(
        db.transact("select b / a as r from t"),
        "r float\n0.000\nNaN"
    );
}
