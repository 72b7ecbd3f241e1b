use std::path::PathBuf;
use std::sync::Arc;

use crate::builder::ReferenceBuilder;
use crate::reference::{PackageReference, Reference, ResolvedPackageReference};
use crate::result::RestoreResult;
use crate::settings::RestoreSettings;
use crate::stores::{PendingLookup, RequestStore, ResolvedStore, SourceSet};
use pkgrestore_constants::PACKAGE_MANAGER_KEY;
use pkgrestore_resolver::{
    EngineFactory, ErrorReporter, GuardedReporter, LazyEngine, ResolveOutcome, ResolveRequest,
    package_manager_lines,
};
use pkgrestore_utils::{matches_resolved_version, reference_key};

/// Session-scoped restore state: pending requests, resolved packages, restore
/// sources and the dependency engine handle. Restores are expected to run one
/// at a time per context.
pub struct RestoreContext {
    requested: RequestStore,
    resolved: ResolvedStore,
    sources: SourceSet,
    engine: Arc<LazyEngine>,
    reporter: GuardedReporter,
    settings: RestoreSettings,
}

impl RestoreContext {
    #[must_use]
    pub fn new(factory: EngineFactory) -> Self {
        Self::with_settings(factory, RestoreSettings::default())
    }

    #[must_use]
    pub fn with_settings(factory: EngineFactory, settings: RestoreSettings) -> Self {
        Self {
            requested: RequestStore::new(),
            resolved: ResolvedStore::new(),
            sources: SourceSet::default(),
            engine: Arc::new(LazyEngine::new(factory)),
            reporter: GuardedReporter::default(),
            settings,
        }
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = GuardedReporter::new(reporter);
        self
    }

    #[must_use]
    pub const fn settings(&self) -> &RestoreSettings {
        &self.settings
    }

    pub fn add_restore_source(&self, source: &str) {
        self.sources.add(source);
    }

    /// Returns `None` when the request conflicts with a resolved or pending
    /// reference of the same name.
    pub fn get_or_add_package_reference(
        &self,
        package_name: &str,
        package_version: Option<&str>,
    ) -> Option<Reference> {
        // Resolved entries shadow pending ones.
        if let Some(resolved) = self.resolved.get(package_name) {
            return matches_resolved_version(&resolved.version, package_version)
                .then_some(Reference::Resolved(resolved));
        }

        match self.requested.get_or_add(package_name, package_version) {
            PendingLookup::Added(reference) | PendingLookup::Existing(reference) => {
                Some(Reference::Requested(reference))
            }
            PendingLookup::Conflict(_) => None,
        }
    }

    /// Resolved entry first, then pending, case insensitive.
    #[must_use]
    pub fn find_package_reference(&self, package_name: &str) -> Option<Reference> {
        self.resolved
            .get(package_name)
            .map(Reference::Resolved)
            .or_else(|| self.requested.get(package_name).map(Reference::Requested))
    }

    #[must_use]
    pub fn restore_sources(&self) -> Vec<String> {
        self.sources.values()
    }

    #[must_use]
    pub fn requested_package_references(&self) -> Vec<Arc<PackageReference>> {
        self.requested.values()
    }

    #[must_use]
    pub fn resolved_package_references(&self) -> Vec<Arc<ResolvedPackageReference>> {
        self.resolved.values()
    }

    #[must_use]
    pub fn get_resolved_package_reference(
        &self,
        package_name: &str,
    ) -> Option<Arc<ResolvedPackageReference>> {
        self.resolved.get(package_name)
    }

    #[must_use]
    pub fn assembly_probing_paths(&self) -> Vec<PathBuf> {
        self.resolved.assembly_probing_paths()
    }

    #[must_use]
    pub fn native_probing_roots(&self) -> Vec<PathBuf> {
        self.resolved.native_probing_roots()
    }

    /// Pending references that have not been resolved yet, in request order.
    #[must_use]
    pub fn newly_requested(&self) -> Vec<Arc<PackageReference>> {
        self.requested
            .values()
            .into_iter()
            .filter(|r| !self.resolved.contains(&r.name))
            .collect()
    }

    /// Every pending reference is sent, including ones an earlier failed
    /// restore left behind.
    #[must_use]
    pub fn package_manager_lines(&self) -> Vec<String> {
        let sources = self.sources.values();
        let requested = self.requested.values();
        package_manager_lines(
            sources.iter().map(String::as_str),
            requested
                .iter()
                .map(|r| (r.name.as_str(), r.version.as_deref())),
        )
    }

    pub async fn restore_async(&self) -> RestoreResult {
        let newly_requested = self.newly_requested();
        let request = ResolveRequest {
            source_descriptor: String::new(),
            batch_id: PACKAGE_MANAGER_KEY.to_string(),
            script_extension: self.settings.script_extension.clone(),
            target_framework: self.settings.target_framework.clone(),
            lines: self.package_manager_lines(),
        };

        pkgrestore_logger::debug(
            &format!(
                "Restoring {} package reference(s) with {} line(s)",
                newly_requested.len(),
                request.lines.len()
            ),
            self.settings.debug,
        );

        let engine = Arc::clone(&self.engine);
        let reporter = self.reporter.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            engine
                .get()
                .map(|engine| engine.resolve(&request, &reporter))
        })
        .await;

        let (resolutions, roots) = match outcome {
            Ok(Ok(ResolveOutcome::Resolved {
                resolutions, roots, ..
            })) => (resolutions, roots),
            Ok(Ok(ResolveOutcome::Failed { stdout })) => {
                return RestoreResult::failure(newly_requested, stdout.join("\n"));
            }
            Ok(Err(e)) => return RestoreResult::failure(newly_requested, e.to_string()),
            Err(e) => {
                return RestoreResult::failure(
                    newly_requested,
                    format!("Dependency manager terminated unexpectedly: {e}"),
                );
            }
        };

        pkgrestore_logger::debug(
            &format!("Resolver returned {} package root(s)", roots.len()),
            self.settings.debug,
        );

        let previously_resolved = self.resolved.keys();

        let built = ReferenceBuilder::new(&self.requested, self.settings.debug)
            .build(&resolutions, &roots);
        for reference in built {
            self.resolved.try_add(Arc::new(reference));
        }

        let resolved_references = self
            .resolved
            .values()
            .into_iter()
            .filter(|r| !previously_resolved.contains(&reference_key(&r.name)))
            .collect();

        RestoreResult::success(newly_requested, resolved_references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pkgrestore_error::RestoreError;
    use pkgrestore_resolver::{DependencyEngine, ErrorReportType};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers each resolve with the next scripted outcome and records the lines it saw.
    struct ScriptedEngine {
        outcomes: Mutex<Vec<ResolveOutcome>>,
        seen_lines: Mutex<Vec<Vec<String>>>,
    }

    impl ScriptedEngine {
        fn new(outcomes: Vec<ResolveOutcome>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into_iter().rev().collect()),
                seen_lines: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.seen_lines.lock().expect("lock").clone()
        }
    }

    impl DependencyEngine for ScriptedEngine {
        fn resolve(&self, request: &ResolveRequest, reporter: &dyn ErrorReporter) -> ResolveOutcome {
            self.seen_lines
                .lock()
                .expect("lock")
                .push(request.lines.clone());
            reporter.report(ErrorReportType::Warning, 0, "scripted resolve");
            self.outcomes
                .lock()
                .expect("lock")
                .pop()
                .unwrap_or(ResolveOutcome::Resolved {
                    resolutions: Vec::new(),
                    source_files: Vec::new(),
                    roots: Vec::new(),
                })
        }
    }

    fn context_for(engine: &Arc<ScriptedEngine>) -> RestoreContext {
        let engine: Arc<dyn DependencyEngine> = Arc::clone(engine) as Arc<dyn DependencyEngine>;
        RestoreContext::new(Box::new(move || Ok(Arc::clone(&engine))))
    }

    fn resolved_foo() -> ResolveOutcome {
        ResolveOutcome::Resolved {
            resolutions: vec![
                PathBuf::from("/pkgs/foo/1.0.0/lib/Foo.dll"),
                PathBuf::from("/pkgs/foo/1.0.0/lib/Foo.Core.dll"),
                PathBuf::from("/pkgs/elsewhere/Other.dll"),
            ],
            source_files: Vec::new(),
            roots: vec![PathBuf::from("/pkgs/foo/1.0.0")],
        }
    }

    #[test]
    fn test_repeated_request_returns_same_entry() {
        let context = context_for(&ScriptedEngine::new(Vec::new()));
        let first = context
            .get_or_add_package_reference("Foo", Some("1.0.0"))
            .expect("added");
        let second = context
            .get_or_add_package_reference("FOO", Some("1.0.0"))
            .expect("existing");
        assert!(first.same_entry(&second));
    }

    #[test]
    fn test_unconstrained_then_pinned_conflicts() {
        let context = context_for(&ScriptedEngine::new(Vec::new()));
        assert!(context.get_or_add_package_reference("Foo", None).is_some());
        assert!(
            context
                .get_or_add_package_reference("Foo", Some("2.0.0"))
                .is_none()
        );

        let requested = context.requested_package_references();
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].version, None);
    }

    #[tokio::test]
    async fn test_restore_resolves_requested_package() {
        let engine = ScriptedEngine::new(vec![resolved_foo()]);
        let context = context_for(&engine);
        context.add_restore_source("/feeds/local");
        context.get_or_add_package_reference("Foo", Some("1.0.0"));

        let result = context.restore_async().await;

        assert!(result.succeeded);
        assert_eq!(result.requested_packages.len(), 1);
        assert_eq!(result.resolved_references.len(), 1);
        let foo = &result.resolved_references[0];
        assert_eq!(foo.name, "Foo");
        assert_eq!(foo.version, "1.0.0");
        assert_eq!(
            foo.assembly_paths,
            vec![
                PathBuf::from("/pkgs/foo/1.0.0/lib/Foo.dll"),
                PathBuf::from("/pkgs/foo/1.0.0/lib/Foo.Core.dll"),
            ]
        );
        assert_eq!(foo.probing_paths, vec![PathBuf::from("/pkgs/foo/1.0.0")]);
        assert_eq!(
            engine.calls(),
            vec![vec![
                "RestoreSources=/feeds/local".to_string(),
                "Include=Foo, Version=1.0.0".to_string(),
            ]]
        );

        let lookup = context
            .get_or_add_package_reference("foo", None)
            .expect("resolved");
        assert!(lookup.is_resolved());
    }

    #[tokio::test]
    async fn test_second_restore_is_a_no_op() {
        let engine = ScriptedEngine::new(vec![resolved_foo(), resolved_foo()]);
        let context = context_for(&engine);
        context.get_or_add_package_reference("Foo", Some("1.0.0"));

        assert!(context.restore_async().await.succeeded);
        let second = context.restore_async().await;

        assert!(second.succeeded);
        assert!(second.requested_packages.is_empty());
        assert!(second.resolved_references.is_empty());
        assert_eq!(context.resolved_package_references().len(), 1);
    }

    #[tokio::test]
    async fn test_newly_resolved_excludes_previous() {
        let bar = ResolveOutcome::Resolved {
            resolutions: Vec::new(),
            source_files: Vec::new(),
            roots: vec![
                PathBuf::from("/pkgs/foo/1.0.0"),
                PathBuf::from("/pkgs/bar/2.0.0"),
            ],
        };
        let engine = ScriptedEngine::new(vec![resolved_foo(), bar]);
        let context = context_for(&engine);
        context.get_or_add_package_reference("Foo", Some("1.0.0"));
        context.restore_async().await;

        context.get_or_add_package_reference("Bar", None);
        let result = context.restore_async().await;

        let names: Vec<_> = result
            .resolved_references
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["Bar".to_string()]);
        assert_eq!(result.requested_packages.len(), 1);
        assert_eq!(result.requested_packages[0].name, "Bar");
    }

    #[tokio::test]
    async fn test_failed_restore_leaves_resolved_untouched() {
        let engine = ScriptedEngine::new(vec![
            resolved_foo(),
            ResolveOutcome::Failed {
                stdout: vec!["X".to_string()],
            },
        ]);
        let context = context_for(&engine);
        context.get_or_add_package_reference("Foo", Some("1.0.0"));
        context.restore_async().await;
        let before = context.resolved_package_references();

        context.get_or_add_package_reference("Broken", Some("0.1.0"));
        let result = context.restore_async().await;

        assert!(!result.succeeded);
        assert_eq!(result.errors.as_deref(), Some("X"));
        assert_eq!(result.requested_packages.len(), 1);
        assert_eq!(context.resolved_package_references(), before);
    }

    #[tokio::test]
    async fn test_failed_requests_are_retried() {
        let engine = ScriptedEngine::new(vec![ResolveOutcome::Failed {
            stdout: vec!["offline".to_string()],
        }]);
        let context = context_for(&engine);
        context.get_or_add_package_reference("Foo", Some("1.0.0"));

        assert!(!context.restore_async().await.succeeded);
        context.get_or_add_package_reference("Bar", None);
        context.restore_async().await;

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[1],
            vec![
                "Include=Foo, Version=1.0.0".to_string(),
                "Include=Bar, Version=".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_resolved_version_mismatch_is_rejected() {
        let context = context_for(&ScriptedEngine::new(vec![resolved_foo()]));
        context.get_or_add_package_reference("Foo", Some("1.0.0"));
        context.restore_async().await;

        assert!(
            context
                .get_or_add_package_reference("Foo", Some("2.0.0"))
                .is_none()
        );
        assert!(
            context
                .get_or_add_package_reference("foo", Some("*"))
                .is_some_and(|r| r.is_resolved())
        );
    }

    #[tokio::test]
    async fn test_engine_is_created_lazily_once() {
        let created = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&created);
        let engine: Arc<dyn DependencyEngine> = ScriptedEngine::new(Vec::new());
        let context = RestoreContext::new(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::clone(&engine))
        }));

        assert_eq!(created.load(Ordering::SeqCst), 0);
        context.restore_async().await;
        context.restore_async().await;
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_padded_name_is_sent_trimmed() {
        let context = context_for(&ScriptedEngine::new(Vec::new()));
        context.get_or_add_package_reference(" Foo ", None);

        assert!(context.find_package_reference("foo").is_some());
        assert_eq!(
            context.package_manager_lines(),
            vec!["Include=Foo, Version=".to_string()]
        );
    }

    #[derive(Default)]
    struct RecordingReporter(Mutex<Vec<(ErrorReportType, i32, String)>>);

    impl ErrorReporter for RecordingReporter {
        fn report(&self, kind: ErrorReportType, code: i32, message: &str) {
            self.0.lock().expect("lock").push((kind, code, message.to_string()));
        }
    }

    #[tokio::test]
    async fn test_engine_diagnostics_reach_custom_reporter() {
        let recording = Arc::new(RecordingReporter::default());
        let context = context_for(&ScriptedEngine::new(Vec::new()))
            .with_reporter(Arc::clone(&recording) as Arc<dyn ErrorReporter>);
        context.get_or_add_package_reference("Foo", None);

        context.restore_async().await;

        assert_eq!(
            recording.0.lock().expect("lock").as_slice(),
            &[(ErrorReportType::Warning, 0, "scripted resolve".to_string())]
        );
    }

    #[tokio::test]
    async fn test_engine_construction_failure_is_a_failed_restore() {
        let context = RestoreContext::new(Box::new(|| {
            Err(RestoreError::EngineUnavailable("no engine".to_string()))
        }));
        context.get_or_add_package_reference("Foo", None);

        let result = context.restore_async().await;
        assert!(!result.succeeded);
        assert_eq!(
            result.errors.as_deref(),
            Some("Dependency manager unavailable: no engine")
        );
    }
}
