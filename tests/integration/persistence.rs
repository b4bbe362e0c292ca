use jobmatch::search::InitOutcome;

use crate::fixture::{TestRoot, job};

fn restart_keeps_added_jobs(backend: &str) {
    let root = TestRoot::new();
    {
        let ctx = root.context(TestRoot::config(backend));
        assert_eq!(ctx.init_outcome, InitOutcome::Bootstrapped(12));
        let extra = job("extra-1", "Embedded Rust Engineer", "Ferrous", "Remote", &["rust"]);
        let vector = ctx.embeddings.embed(&extra.embedding_text());
        ctx.store.add_vector("extra-1", vector, extra).unwrap();
    }

    let ctx = root.context(TestRoot::config(backend));
    assert_eq!(ctx.init_outcome, InitOutcome::Loaded(13));
    let restored = ctx.store.get("extra-1").unwrap();
    assert_eq!(restored.company, "Ferrous");
    assert_eq!(ctx.store.keyword_search("embedded", 3)[0].0, "extra-1");
}

#[test]
fn file_backend_survives_restart() {
    restart_keeps_added_jobs("file");
}

#[test]
fn sqlite_backend_survives_restart() {
    restart_keeps_added_jobs("sqlite");
}

#[test]
fn memory_backend_starts_fresh() {
    let root = TestRoot::new();
    {
        let ctx = root.context(TestRoot::config("memory"));
        ctx.store.clear_all();
    }
    let ctx = root.context(TestRoot::config("memory"));
    assert_eq!(ctx.init_outcome, InitOutcome::Bootstrapped(12));
}

#[test]
fn cleared_store_is_not_reseeded() {
    let root = TestRoot::new();
    {
        let ctx = root.context(TestRoot::config("file"));
        ctx.store.clear_all();
        ctx.store.flush().unwrap();
    }
    let ctx = root.context(TestRoot::config("file"));
    assert_eq!(ctx.init_outcome, InitOutcome::Loaded(0));
    assert!(ctx.store.is_empty());
}

#[test]
fn unknown_backend_is_rejected() {
    let root = TestRoot::new();
    let result = jobmatch::app::AppContext::new(root.path().to_path_buf(), TestRoot::config("redis"));
    assert!(result.is_err());
}
