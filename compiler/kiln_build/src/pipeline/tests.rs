use super::*;
use pretty_assertions::assert_eq;

use crate::config::CacheScope;
use crate::testing::{Fixture, RecordingSink, StampTranslator};

fn config(fx: &Fixture) -> crate::config::BuildConfigBuilder {
    BuildConfig::builder().search_root(fx.path("src"))
}

fn reject(_source: &str) -> Result<String, String> {
    Err("cannot translate".to_string())
}

fn names(set: &DependencySet) -> Vec<String> {
    let mut names: Vec<_> = set.iter().map(|d| d.logical_name.clone()).collect();
    names.sort();
    names
}

// ── Run ─────────────────────────────────────────────────────

#[test]
fn compiles_only_translatable_dependencies() {
    let fx = Fixture::new();
    let main = fx.path("src/Main.elm");
    fx.write("src/Foo/Bar.elmx", "bar = 1\n");
    fx.write("src/Baz.elm", "baz = 2\n");
    let translator = StampTranslator::default();
    let sink = Arc::new(RecordingSink::default());
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), translator.clone())
        .unwrap()
        .with_dependency_sink(sink.clone());

    let source = "import Foo.Bar\nimport Baz\n";
    let completion = pipeline
        .run(Invocation::new(&main, source).with_map("{\"version\":3}"))
        .unwrap();

    assert_eq!(completion.source, source);
    assert_eq!(completion.map.as_deref(), Some("{\"version\":3}"));
    assert!(!completion.from_cache);
    assert_eq!(names(&completion.dependencies), vec!["Baz", "Foo/Bar"]);
    assert_eq!(
        completion.artifacts,
        vec![ArtifactOutcome {
            source: fx.path("src/Foo/Bar.elmx"),
            artifact: fx.path("src/Foo/Bar.elm"),
            status: ArtifactStatus::Compiled,
        }]
    );
    assert_eq!(fx.read("src/Foo/Bar.elm"), "-- generated\nbar = 1\n");
    assert_eq!(fx.read("src/Baz.elm"), "baz = 2\n");
    assert_eq!(translator.calls(), 1);
    assert_eq!(
        sink.paths(),
        vec![fx.path("src/Baz.elm"), fx.path("src/Foo/Bar.elmx")]
    );
}

#[test]
fn second_run_reuses_fresh_artifacts() {
    let fx = Fixture::new();
    let main = fx.path("src/Main.elm");
    fx.write("src/View.elmx", "view = 1\n");
    let translator = StampTranslator::default();
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), translator.clone()).unwrap();

    let first = pipeline.run(Invocation::new(&main, "import View\n")).unwrap();
    let second = pipeline.run(Invocation::new(&main, "import View\n")).unwrap();

    assert_eq!(
        first.stats(),
        CompletionStats {
            total: 1,
            compiled: 1,
            reused: 0
        }
    );
    assert_eq!(
        second.stats(),
        CompletionStats {
            total: 1,
            compiled: 0,
            reused: 1
        }
    );
    assert_eq!(second.stats().to_string(), "1 artifacts (0 compiled, 1 up to date)");
    assert_eq!(translator.calls(), 1);
}

#[test]
fn edited_source_is_recompiled() {
    let fx = Fixture::new();
    let main = fx.path("src/Main.elm");
    fx.write("src/View.elmx", "old\n");
    fx.write("src/View.elm", "-- generated\nold\n");
    fx.touch("src/View.elm", 1_000);
    fx.touch("src/View.elmx", 2_000);
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), StampTranslator::default()).unwrap();

    let completion = pipeline.run(Invocation::new(&main, "import View\n")).unwrap();

    assert_eq!(completion.stats().compiled, 1);
}

#[test]
fn unresolved_imports_do_not_fail() {
    let fx = Fixture::new();
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), StampTranslator::default()).unwrap();

    let completion = pipeline
        .run(Invocation::new(fx.path("src/Main.elm"), "import Html\nimport Json.Decode\n"))
        .unwrap();

    assert!(completion.dependencies.is_empty());
    assert!(completion.artifacts.is_empty());
}

#[test]
fn artifacts_go_to_output_dir() {
    let fx = Fixture::new();
    fx.write("src/Pages/Home.elmx", "home\n");
    let config = config(&fx).output_dir(fx.path("build")).build().unwrap();
    let pipeline = Pipeline::new(config, StampTranslator::default()).unwrap();

    let completion = pipeline
        .run(Invocation::new(fx.path("src/Main.elm"), "import Pages.Home\n"))
        .unwrap();

    assert_eq!(completion.artifacts[0].artifact, fx.path("build/Pages/Home.elm"));
    assert!(!fx.path("src/Pages/Home.elm").exists());
}

#[test]
fn translator_failure_fails_the_invocation() {
    let fx = Fixture::new();
    fx.write("src/Good.elmx", "");
    fx.write("src/Bad.elmx", "");
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), reject).unwrap();

    let err = pipeline
        .run(Invocation::new(fx.path("src/Main.elm"), "import Good\nimport Bad\n"))
        .unwrap_err();

    assert!(matches!(err, BuildError::Translation { .. }), "{err:?}");
}

#[test]
fn same_result_for_any_pool_size() {
    let fx = Fixture::new();
    let mut source = String::new();
    for i in 0..16 {
        source.push_str(&format!("import Page{i}\n"));
        fx.write(&format!("src/Page{i}.elmx"), &format!("import Shared{}\n", i % 3));
    }
    for i in 0..3 {
        fx.write(&format!("src/Shared{i}.elm"), "");
    }

    let mut results = Vec::new();
    for jobs in [1, 4] {
        let config = config(&fx)
            .output_dir(fx.path(&format!("build{jobs}")))
            .jobs(jobs)
            .build()
            .unwrap();
        let pipeline = Pipeline::new(config, StampTranslator::default()).unwrap();
        let completion = pipeline
            .run(Invocation::new(fx.path("src/Main.elm"), source.as_str()))
            .unwrap();
        let sources: Vec<PathBuf> = completion.artifacts.iter().map(|a| a.source.clone()).collect();
        results.push((completion.dependencies, sources));
    }

    assert_eq!(results[0].0.len(), 19);
    assert_eq!(results[0].0, results[1].0);
    assert_eq!(results[0].1, results[1].1);
}

// ── Cache ───────────────────────────────────────────────────

#[test]
fn session_cache_reuses_set_across_entries() {
    let fx = Fixture::new();
    fx.write("src/Shared.elm", "");
    fx.write("src/Other.elm", "");
    let config = config(&fx)
        .cache(true)
        .cache_scope(CacheScope::Session)
        .build()
        .unwrap();
    let sink = Arc::new(RecordingSink::default());
    let pipeline = Pipeline::new(config, StampTranslator::default())
        .unwrap()
        .with_dependency_sink(sink.clone());

    let first = pipeline
        .run(Invocation::new(fx.path("src/Main.elm"), "import Shared\n"))
        .unwrap();

    // Nothing on disk is consulted on a hit.
    fx.remove("src/Shared.elm");
    let second = pipeline
        .run(Invocation::new(fx.path("src/Admin.elm"), "import Other\n"))
        .unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert!(Arc::ptr_eq(&first.dependencies, &second.dependencies));
    assert_eq!(names(&second.dependencies), vec!["Shared"]);
    assert_eq!(
        sink.paths(),
        vec![fx.path("src/Shared.elm"), fx.path("src/Shared.elm")]
    );
}

#[test]
fn entry_cache_keeps_entries_apart() {
    let fx = Fixture::new();
    fx.write("src/Shared.elm", "");
    fx.write("src/Other.elm", "");
    let pipeline =
        Pipeline::new(config(&fx).cache(true).build().unwrap(), StampTranslator::default()).unwrap();
    let main = fx.path("src/Main.elm");
    let admin = fx.path("src/Admin.elm");

    let a = pipeline.run(Invocation::new(&main, "import Shared\n")).unwrap();
    let b = pipeline.run(Invocation::new(&admin, "import Other\n")).unwrap();
    let again = pipeline.run(Invocation::new(&main, "import Shared\n")).unwrap();

    assert_eq!(names(&a.dependencies), vec!["Shared"]);
    assert_eq!(names(&b.dependencies), vec!["Other"]);
    assert!(!b.from_cache);
    assert!(again.from_cache);
    assert_eq!(pipeline.cache().len(), 2);
}

#[test]
fn invalidate_forces_a_new_walk() {
    let fx = Fixture::new();
    fx.write("src/Old.elm", "");
    fx.write("src/New.elm", "");
    let pipeline =
        Pipeline::new(config(&fx).cache(true).build().unwrap(), StampTranslator::default()).unwrap();
    let main = fx.path("src/Main.elm");

    pipeline.run(Invocation::new(&main, "import Old\n")).unwrap();
    let stale = pipeline.run(Invocation::new(&main, "import New\n")).unwrap();
    assert_eq!(names(&stale.dependencies), vec!["Old"]);

    assert!(pipeline.cache().invalidate(&CacheKey::Entry(main.clone())));
    let fresh = pipeline.run(Invocation::new(&main, "import New\n")).unwrap();

    assert!(!fresh.from_cache);
    assert_eq!(names(&fresh.dependencies), vec!["New"]);
}

#[test]
fn disabled_cache_still_records_walks() {
    let fx = Fixture::new();
    fx.write("src/Util.elm", "");
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), StampTranslator::default()).unwrap();
    let main = fx.path("src/Main.elm");

    let first = pipeline.run(Invocation::new(&main, "import Util\n")).unwrap();
    let second = pipeline.run(Invocation::new(&main, "import Util\n")).unwrap();

    assert!(!first.from_cache && !second.from_cache);
    assert_eq!(pipeline.cache().len(), 1);
    assert_eq!(pipeline.cache().stats(), crate::cache::CacheStats::default());
}

#[test]
fn empty_cached_set_is_not_a_hit() {
    let fx = Fixture::new();
    let pipeline =
        Pipeline::new(config(&fx).cache(true).build().unwrap(), StampTranslator::default()).unwrap();
    let main = fx.path("src/Main.elm");

    pipeline.run(Invocation::new(&main, "import Html\n")).unwrap();
    fx.write("src/Html.elm", "");
    let second = pipeline.run(Invocation::new(&main, "import Html\n")).unwrap();

    assert!(!second.from_cache);
    assert_eq!(names(&second.dependencies), vec!["Html"]);
}

#[test]
fn pipelines_can_share_a_cache() {
    let fx = Fixture::new();
    fx.write("src/Util.elm", "");
    let cache = Arc::new(DependencyCache::new());
    let build = || {
        Pipeline::new(config(&fx).cache(true).build().unwrap(), StampTranslator::default())
            .unwrap()
            .with_cache(Arc::clone(&cache))
    };
    let main = fx.path("src/Main.elm");

    build().run(Invocation::new(&main, "import Util\n")).unwrap();
    let completion = build().run(Invocation::new(&main, "import Util\n")).unwrap();

    assert!(completion.from_cache);
    assert_eq!(cache.stats().hits, 1);
}

// ── Resolve ─────────────────────────────────────────────────

#[test]
fn resolve_does_not_compile() {
    let fx = Fixture::new();
    fx.write("src/View.elmx", "");
    let translator = StampTranslator::default();
    let pipeline = Pipeline::new(config(&fx).build().unwrap(), translator.clone()).unwrap();

    let set = pipeline
        .resolve(&fx.path("src/Main.elm"), "import View\n")
        .unwrap();

    assert_eq!(names(&set), vec!["View"]);
    assert_eq!(translator.calls(), 0);
    assert!(!fx.path("src/View.elm").exists());
    assert!(format!("{pipeline:?}").contains("Pipeline"));
    assert_eq!(pipeline.config().jobs(), 0);
}
