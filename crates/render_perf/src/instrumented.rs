//! Lifecycle instrumentation
//!
//! [`wrap`] turns any [`ComponentType`] into an [`Instrumented`] type whose
//! instances bracket every render cycle with a start mark, an end mark and a
//! measure. Rendering and every lifecycle hook are delegated unchanged.
//!
//! # Cycle boundaries
//!
//! - Mount: starts before the wrapped `will_mount`, finishes after the
//!   wrapped `did_mount`.
//! - Prop update: starts before the wrapped `will_receive_props`.
//! - State update: starts before the wrapped `will_update`.
//! - Updates finish after the wrapped `did_update`.
//!
//! The measure name is resolved when the cycle finishes, from the props and
//! state that were just rendered. Mark labels carry the wrapped type's
//! declared name instead (`<declared>-<cycle>-start|end`), since the start
//! mark is written before the resolved name exists.
//!
//! The default [`Timeline`] keeps at least [`MIN_TIMELINE_ENTRIES`] entries
//! so a cycle's start mark survives until its measure is written.

use crate::backend::{PerformanceBackend, Timeline};
use crate::cycle::{CycleId, MarkLabel};
use crate::error::BackendResult;
use crate::naming::{NameResolver, NamingFn};
use crate::options::{BackendErrorPolicy, InstrumentOptions, InstrumentSettings};
use component_model::{Component, ComponentError, ComponentResult, ComponentType};
use std::sync::Arc;

/// Entries one render cycle writes: start mark, end mark, measure.
pub const MIN_TIMELINE_ENTRIES: usize = 3;

type PropsOf<T> = <<T as ComponentType>::Instance as Component>::Props;
type StateOf<T> = <<T as ComponentType>::Instance as Component>::State;

/// Wrap a component type so that every render cycle is timed.
///
/// `naming` derives the measure name from props and state; without it every
/// measure is named after `base.display_name()`.
pub fn wrap<T>(
    base: T,
    naming: Option<NamingFn<PropsOf<T>, StateOf<T>>>,
    options: InstrumentOptions,
) -> Instrumented<T>
where
    T: ComponentType,
{
    let settings = options.settings;
    let (performance, timeline) = match options.performance {
        Some(backend) => (backend, None),
        None => {
            let cap = settings.max_timeline_entries.max(MIN_TIMELINE_ENTRIES);
            let timeline = Arc::new(Timeline::new().with_max_entries(cap));
            let backend: Arc<dyn PerformanceBackend> = timeline.clone();
            (backend, Some(timeline))
        }
    };
    let names = NameResolver::new(base.display_name(), naming);

    Instrumented {
        base,
        timeline,
        shared: Arc::new(Shared {
            names,
            performance,
            settings,
        }),
    }
}

/// Wrap-time configuration shared by every instance of one instrumented type.
struct Shared<P, S> {
    names: NameResolver<P, S>,
    performance: Arc<dyn PerformanceBackend>,
    settings: InstrumentSettings,
}

impl<P, S> Shared<P, S> {
    /// Apply the backend error policy to one backend call.
    fn emit(&self, result: BackendResult<()>) -> ComponentResult<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) => match self.settings.on_backend_error {
                BackendErrorPolicy::Propagate => Err(ComponentError::instrumentation(err)),
                BackendErrorPolicy::Isolate => {
                    tracing::warn!(
                        target: "render_perf",
                        component = self.names.fallback(),
                        "timing backend failed: {}",
                        err
                    );
                    Ok(())
                }
            },
        }
    }
}

/// A component type produced by [`wrap`].
pub struct Instrumented<T: ComponentType> {
    base: T,
    /// Set when no backend was supplied and the default timeline was bound
    timeline: Option<Arc<Timeline>>,
    shared: Arc<Shared<PropsOf<T>, StateOf<T>>>,
}

impl<T: ComponentType> Instrumented<T> {
    /// The timing backend bound at wrap time.
    pub fn performance(&self) -> Arc<dyn PerformanceBackend> {
        Arc::clone(&self.shared.performance)
    }

    /// The default timeline, if no backend was supplied at wrap time.
    pub fn timeline(&self) -> Option<&Arc<Timeline>> {
        self.timeline.as_ref()
    }

    pub fn settings(&self) -> &InstrumentSettings {
        &self.shared.settings
    }

    /// The wrapped component type.
    pub fn base(&self) -> &T {
        &self.base
    }
}

impl<T: ComponentType> ComponentType for Instrumented<T> {
    type Instance = InstrumentedInstance<T::Instance>;

    fn display_name(&self) -> &str {
        self.base.display_name()
    }

    fn create(&self, props: &PropsOf<T>) -> Self::Instance {
        InstrumentedInstance {
            inner: self.base.create(props),
            shared: Arc::clone(&self.shared),
            open: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Mounting,
    /// Opened by `will_receive_props`, `will_update` not yet seen
    ReceivingProps,
    Updating,
}

/// A render cycle whose start mark has been written.
#[derive(Debug)]
struct OpenCycle {
    id: CycleId,
    stage: Stage,
}

/// An instance of an [`Instrumented`] type.
pub struct InstrumentedInstance<C: Component> {
    inner: C,
    shared: Arc<Shared<C::Props, C::State>>,
    open: Option<OpenCycle>,
}

impl<C: Component> InstrumentedInstance<C> {
    /// The wrapped instance.
    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    fn begin(&mut self, stage: Stage) -> ComponentResult<()> {
        if !self.shared.settings.enabled {
            return Ok(());
        }
        self.discard_open("superseded by a new render cycle");

        let id = CycleId::new();
        let name = self.shared.names.fallback();
        self.open = Some(OpenCycle { id, stage });

        tracing::trace!(target: "render_perf", component = name, cycle = %id, "render cycle started");
        let label = MarkLabel::start(name, id).to_string();
        self.shared.emit(self.shared.performance.mark(&label))
    }

    fn finish(&mut self, props: &C::Props, state: &C::State) -> ComponentResult<()> {
        let Some(cycle) = self.open.take() else {
            return Ok(());
        };
        let shared = &self.shared;
        let component = shared.names.fallback();
        let start = MarkLabel::start(component, cycle.id).to_string();
        let end = MarkLabel::end(component, cycle.id).to_string();

        shared.emit(shared.performance.mark(&end))?;
        let name = shared.names.resolve(props, state);
        shared.emit(shared.performance.measure(&name, &start, &end))?;

        tracing::trace!(target: "render_perf", measure = %name, cycle = %cycle.id, "render cycle finished");
        Ok(())
    }

    /// Forget a cycle that never reached its finishing hook.
    fn discard_open(&mut self, reason: &str) {
        if let Some(cycle) = self.open.take() {
            tracing::debug!(
                target: "render_perf",
                component = self.shared.names.fallback(),
                cycle = %cycle.id,
                stage = ?cycle.stage,
                "discarding unfinished render cycle: {}",
                reason
            );
        }
    }
}

impl<C: Component> Component for InstrumentedInstance<C> {
    type Props = C::Props;
    type State = C::State;
    type Output = C::Output;

    fn initial_state(&self, props: &C::Props) -> C::State {
        self.inner.initial_state(props)
    }

    fn will_mount(&mut self, props: &C::Props, state: &C::State) -> ComponentResult<()> {
        self.begin(Stage::Mounting)?;
        self.inner.will_mount(props, state)
    }

    fn did_mount(&mut self, props: &C::Props, state: &C::State) -> ComponentResult<()> {
        self.inner.did_mount(props, state)?;
        self.finish(props, state)
    }

    fn will_receive_props(
        &mut self,
        props: &C::Props,
        next_props: &C::Props,
    ) -> ComponentResult<()> {
        let result = match self.begin(Stage::ReceivingProps) {
            Ok(()) => self.inner.will_receive_props(props, next_props),
            Err(err) => Err(err),
        };
        // A cycle left in `ReceivingProps` would be resumed by the next
        // state-only update.
        if result.is_err() {
            self.discard_open("will_receive_props failed");
        }
        result
    }

    fn will_update(&mut self, next_props: &C::Props, next_state: &C::State) -> ComponentResult<()> {
        let resumed = match self.open.as_mut() {
            Some(cycle) if cycle.stage == Stage::ReceivingProps => {
                cycle.stage = Stage::Updating;
                true
            }
            _ => false,
        };
        if !resumed {
            self.begin(Stage::Updating)?;
        }
        self.inner.will_update(next_props, next_state)
    }

    fn did_update(
        &mut self,
        props: &C::Props,
        state: &C::State,
        prev_props: &C::Props,
        prev_state: &C::State,
    ) -> ComponentResult<()> {
        self.inner.did_update(props, state, prev_props, prev_state)?;
        self.finish(props, state)
    }

    fn will_unmount(&mut self) -> ComponentResult<()> {
        self.discard_open("unmounted");
        self.inner.will_unmount()
    }

    fn render(&self, props: &C::Props, state: &C::State) -> ComponentResult<C::Output> {
        self.inner.render(props, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TimelineEntry;
    use component_model::{Class, Mounted};

    struct Label;

    impl Component for Label {
        type Props = String;
        type State = u32;
        type Output = String;

        fn initial_state(&self, _props: &String) -> u32 {
            0
        }

        fn render(&self, props: &String, state: &u32) -> ComponentResult<String> {
            Ok(format!("<p>{}#{}</p>", props, state))
        }
    }

    fn label_class() -> Class<Label> {
        Class::<Label>::new("Label", |_| Label)
    }

    #[test]
    fn test_display_name_passes_through() {
        let wrapped = wrap(label_class(), None, InstrumentOptions::new());
        assert_eq!(wrapped.display_name(), "Label");
        assert_eq!(wrapped.base().display_name(), "Label");
        assert!(wrapped.settings().enabled);
    }

    #[test]
    fn test_mount_writes_start_end_measure() {
        let timeline = Arc::new(Timeline::new());
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new().with_performance(timeline.clone()),
        );
        assert!(wrapped.timeline().is_none());

        let mounted = Mounted::mount(&wrapped, "hi".to_string()).unwrap();
        assert_eq!(mounted.output(), "<p>hi#0</p>");

        let entries = timeline.entries();
        assert_eq!(entries.len(), 3);
        let start = entries[0].name().to_string();
        let end = entries[1].name().to_string();
        assert!(start.starts_with("Label-") && start.ends_with("-start"));
        assert!(end.starts_with("Label-") && end.ends_with("-end"));
        match &entries[2] {
            TimelineEntry::Measure {
                name,
                start_mark,
                end_mark,
                ..
            } => {
                assert_eq!(name, "Label");
                assert_eq!(start_mark, &start);
                assert_eq!(end_mark, &end);
            }
            other => panic!("expected measure, got {:?}", other),
        }
    }

    #[test]
    fn test_disabled_is_pass_through() {
        let timeline = Arc::new(Timeline::new());
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new()
                .with_performance(timeline.clone())
                .enabled(false),
        );

        let mut mounted = Mounted::mount(&wrapped, "hi".to_string()).unwrap();
        mounted.update("yo".to_string()).unwrap();
        mounted.set_state(|n| *n += 1).unwrap();

        assert_eq!(mounted.output(), "<p>yo#1</p>");
        assert!(timeline.entries().is_empty());
    }

    #[test]
    fn test_default_timeline_is_bound_at_wrap_time() {
        let settings = InstrumentSettings {
            max_timeline_entries: 4,
            ..InstrumentSettings::default()
        };
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new().with_settings(settings),
        );

        let mut mounted = Mounted::mount(&wrapped, "a".to_string()).unwrap();
        mounted.update("b".to_string()).unwrap();

        let timeline = wrapped.timeline().expect("default timeline");
        assert_eq!(timeline.max_entries(), 4);

        let entries = timeline.entries();
        assert_eq!(entries.len(), 4);
        assert!(entries[0].is_measure());
        assert!(entries[3].is_measure());
        assert_eq!(timeline.measures_named("Label").len(), 2);
    }

    #[test]
    fn test_state_update_opens_its_own_cycle() {
        let wrapped = wrap(label_class(), None, InstrumentOptions::new());
        let mut instance = wrapped.create(&"a".to_string());

        instance.will_update(&"a".to_string(), &1).unwrap();
        let open = instance.open.as_ref().expect("cycle opened");
        assert_eq!(open.stage, Stage::Updating);

        instance
            .did_update(&"a".to_string(), &1, &"a".to_string(), &0)
            .unwrap();
        assert!(instance.open.is_none());
    }

    #[test]
    fn test_receive_props_cycle_is_resumed_by_will_update() {
        let wrapped = wrap(label_class(), None, InstrumentOptions::new());
        let mut instance = wrapped.create(&"a".to_string());

        instance
            .will_receive_props(&"a".to_string(), &"b".to_string())
            .unwrap();
        let first = instance.open.as_ref().map(|c| c.id);
        instance.will_update(&"b".to_string(), &0).unwrap();
        let second = instance.open.as_ref().map(|c| c.id);

        assert!(first.is_some());
        assert_eq!(first, second);
    }

    struct Offline;

    impl PerformanceBackend for Offline {
        fn mark(&self, _label: &str) -> BackendResult<()> {
            Err(crate::BackendError::Unavailable("offline".to_string()))
        }

        fn measure(&self, _label: &str, _start: &str, _end: &str) -> BackendResult<()> {
            Err(crate::BackendError::Unavailable("offline".to_string()))
        }
    }

    #[test]
    fn test_failed_start_mark_does_not_leave_cycle_open() {
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new()
                .with_performance(Arc::new(Offline))
                .with_error_policy(BackendErrorPolicy::Propagate),
        );
        let mut instance = wrapped.create(&"a".to_string());

        let result = instance.will_receive_props(&"a".to_string(), &"b".to_string());
        assert!(matches!(result, Err(ComponentError::Instrumentation(_))));
        assert!(instance.open.is_none());
    }

    #[test]
    fn test_default_timeline_holds_one_full_cycle() {
        let settings = InstrumentSettings {
            max_timeline_entries: 1,
            ..InstrumentSettings::default()
        };
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new()
                .with_settings(settings)
                .with_error_policy(BackendErrorPolicy::Propagate),
        );

        let mut mounted = Mounted::mount(&wrapped, "a".to_string()).unwrap();
        mounted.update("b".to_string()).unwrap();

        let timeline = wrapped.timeline().expect("default timeline");
        assert_eq!(timeline.max_entries(), MIN_TIMELINE_ENTRIES);

        let entries = timeline.entries();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].is_mark() && entries[1].is_mark());
        assert_eq!(timeline.measures_named("Label").len(), 1);
    }

    #[test]
    fn test_performance_is_the_supplied_backend() {
        let timeline = Arc::new(Timeline::new());
        let wrapped = wrap(
            label_class(),
            None,
            InstrumentOptions::new().with_performance(timeline.clone()),
        );

        wrapped.performance().mark("external").unwrap();
        assert_eq!(timeline.marks()[0].name(), "external");
    }
}
