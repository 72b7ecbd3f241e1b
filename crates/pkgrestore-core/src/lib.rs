pub mod builder;
pub mod context;
pub mod directives;
pub mod progress;
pub mod reference;
pub mod result;
pub mod settings;
pub mod stores;

pub use builder::ReferenceBuilder;
pub use context::RestoreContext;
pub use directives::DirectiveHandler;
pub use progress::{DisplayId, ProgressSupervisor, RestoreEvent, RestoreObserver};
pub use reference::{PackageReference, Reference, ResolvedPackageReference};
pub use result::RestoreResult;
pub use settings::RestoreSettings;
pub use stores::{RequestStore, ResolvedStore};

use std::path::PathBuf;
use std::sync::Arc;

use pkgrestore_resolver::{DependencyEngine, LocalStoreEngine};

/// A context whose engine resolves against the on-disk store at `store`.
#[must_use]
pub fn local_context(store: PathBuf, settings: RestoreSettings) -> RestoreContext {
    RestoreContext::with_settings(
        Box::new(move || {
            Ok(Arc::new(LocalStoreEngine::new(store.clone())) as Arc<dyn DependencyEngine>)
        }),
        settings,
    )
}

/// Queues every `(name, version)` pair and runs a single supervised restore.
pub async fn restore_packages(
    context: &RestoreContext,
    observer: &dyn RestoreObserver,
    sources: &[String],
    packages: &[(String, Option<String>)],
) -> anyhow::Result<RestoreResult> {
    let handler = DirectiveHandler::new(context, observer);

    for source in sources {
        handler.add_restore_source(source);
    }

    let mut rejected = Vec::new();
    for (name, version) in packages {
        if handler
            .add_package_reference(name, version.as_deref())
            .is_none()
        {
            rejected.push(name.clone());
        }
    }
    if !rejected.is_empty() {
        anyhow::bail!("Rejected package reference(s): {}", rejected.join(", "));
    }

    handler.restore().await.map_err(|e| anyhow::anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Lines(Mutex<Vec<String>>);

    impl RestoreObserver for Lines {
        fn display(&self, message: &str) -> DisplayId {
            let mut lines = self.0.lock().expect("lock");
            lines.push(message.to_string());
            DisplayId(lines.len() - 1)
        }

        fn update(&self, id: DisplayId, message: &str) {
            if let Some(line) = self.0.lock().expect("lock").get_mut(id.0) {
                *line = message.to_string();
            }
        }

        fn publish(&self, _event: RestoreEvent) {}
    }

    #[tokio::test]
    async fn test_restore_from_local_store() {
        let store = TempDir::new().expect("temp dir");
        let root = store.path().join("foo").join("1.0.0");
        fs::create_dir_all(root.join("lib")).expect("mkdir");
        fs::write(root.join("lib").join("Foo.dll"), b"dll").expect("write");
        fs::write(root.join("lib").join("Foo.xml"), b"doc").expect("write");

        let context = local_context(store.path().to_path_buf(), RestoreSettings::default());
        let observer = Lines::default();
        let packages = vec![("Foo".to_string(), Some("1.0.0".to_string()))];

        let result = restore_packages(&context, &observer, &[], &packages)
            .await
            .expect("restored");

        assert!(result.succeeded);
        let foo = context.get_resolved_package_reference("FOO").expect("resolved");
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.assembly_paths.len(), 2);
        assert_eq!(context.native_probing_roots(), vec![root]);
        assert_eq!(
            observer.0.lock().expect("lock").as_slice(),
            &["Installed package Foo version 1.0.0".to_string()]
        );
    }

    #[tokio::test]
    async fn test_rejected_reference_aborts_before_restore() {
        let store = TempDir::new().expect("temp dir");
        let context = local_context(store.path().to_path_buf(), RestoreSettings::default());
        let packages = vec![
            ("Foo".to_string(), Some("1.0.0".to_string())),
            ("foo".to_string(), Some("2.0.0".to_string())),
        ];

        let err = restore_packages(&context, &Lines::default(), &[], &packages)
            .await
            .expect_err("conflict");
        assert!(err.to_string().contains("foo"));
    }
}
