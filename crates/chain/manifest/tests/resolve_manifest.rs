//! Manifests compiled and resolved end to end

use chain_engine::{ChainResolver, StaticRegistry};
use chain_manifest::{ChainManifest, OperationCatalog};
use chain_types::{BoxError, ChainError};

fn catalog() -> OperationCatalog<i64> {
    let mut catalog: OperationCatalog<i64> = OperationCatalog::new();
    catalog
        .register_sync("sum", |args| Ok(args.iter().sum()))
        .register_sync("inc", |args| Ok(args[0] + 1))
        .register("slow_double", |args| async move {
            tokio::task::yield_now().await;
            Ok::<_, BoxError>(args[0] * 2)
        });
    catalog
}

#[tokio::test]
async fn manifest_resolves_against_registry() {
    let manifest = ChainManifest::from_json_str(
        r#"{
            "declarations": {
                "total": ["left", "right", "sum"],
                "left": ["base", "inc"],
                "right": ["base", "slow_double"],
                "base": "seed"
            }
        }"#,
    )
    .unwrap();

    let decls = manifest.compile(&catalog()).unwrap();
    let resolver = ChainResolver::new(StaticRegistry::new().with("seed", 10i64));
    let resolved = resolver.resolve(&decls).await.unwrap();

    assert_eq!(resolved.get("base"), Some(&10));
    assert_eq!(resolved.get("left"), Some(&11));
    assert_eq!(resolved.get("right"), Some(&20));
    assert_eq!(resolved.get("total"), Some(&31));
    let names: Vec<&str> = resolved.names().map(|n| n.as_str()).collect();
    assert_eq!(names, vec!["total", "left", "right", "base"]);
}

#[tokio::test]
async fn manifest_cycle_is_reported() {
    let manifest = ChainManifest::from_json_str(
        r#"{"declarations": {"a": ["b", "inc"], "b": ["a", "inc"]}}"#,
    )
    .unwrap();

    let decls = manifest.compile(&catalog()).unwrap();
    let err = ChainResolver::new(StaticRegistry::<i64>::new())
        .resolve(&decls)
        .await
        .unwrap_err();
    assert!(matches!(err, ChainError::CyclicDependency { .. }));
    assert_eq!(err.to_string(), "Cyclic dependency: a -> b -> a");
}
