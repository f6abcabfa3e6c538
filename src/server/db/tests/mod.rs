
use anyhow::bail;

use super::Database;

pub fn run_all_db_tests(db: &Database) {
    token::run_token_tests(db);
    token::run_multi_token_tests(db);
    token::run_invalid_input_tests(db);

    run_rollback_tests(db);
}

fn run_rollback_tests(db: &Database) {
    let result: anyhow::Result<()> = db.with_transaction(|tx, _cache| {
        tx.add_token("rollback", "k1")?;
        assert!(tx.has_topic("rollback")?);
        bail!("abort");
    });
    assert!(result.is_err());

    assert!(db.is_resource_open("rollback").unwrap());
    db.with_transaction(|tx, _cache| {
        assert!(!tx.has_topic("rollback")?);
        assert!(tx.get_tokens("rollback")?.is_empty());
        Ok(())
    })
    .unwrap();
}
