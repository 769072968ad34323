//! Mount/update driver
//!
//! [`Mounted`] plays the host framework's part: it owns the props, state and
//! last rendered output of one instance and calls the lifecycle hooks in the
//! host's fixed order.

use crate::{Component, ComponentResult, ComponentType};

/// A mounted component instance.
pub struct Mounted<C: Component> {
    instance: C,
    props: C::Props,
    state: C::State,
    output: C::Output,
}

impl<C: Component> Mounted<C> {
    /// Instantiate and mount a component.
    ///
    /// Order: `create`, `initial_state`, `will_mount`, `render`, `did_mount`.
    pub fn mount<T>(component_type: &T, props: C::Props) -> ComponentResult<Self>
    where
        T: ComponentType<Instance = C>,
    {
        let mut instance = component_type.create(&props);
        let state = instance.initial_state(&props);

        instance.will_mount(&props, &state)?;
        let output = instance.render(&props, &state)?;
        instance.did_mount(&props, &state)?;

        tracing::trace!(
            target: "component_model",
            component = component_type.display_name(),
            "mounted"
        );

        Ok(Self {
            instance,
            props,
            state,
            output,
        })
    }

    /// Apply new props.
    ///
    /// Order: `will_receive_props`, `will_update`, `render`, props applied,
    /// `did_update`. A failed render leaves the previous props and output in
    /// place.
    pub fn update(&mut self, next_props: C::Props) -> ComponentResult<&C::Output> {
        self.instance.will_receive_props(&self.props, &next_props)?;
        self.instance.will_update(&next_props, &self.state)?;

        let output = self.instance.render(&next_props, &self.state)?;
        let prev_props = std::mem::replace(&mut self.props, next_props);
        let prev_state = self.state.clone();
        self.commit(output, prev_props, prev_state)
    }

    /// Apply an internal state change.
    ///
    /// Order: `will_update`, `render`, state applied, `did_update`. A failed
    /// render leaves the previous state and output in place.
    pub fn set_state<F>(&mut self, change: F) -> ComponentResult<&C::Output>
    where
        F: FnOnce(&mut C::State),
        C::Props: Clone,
    {
        let mut next_state = self.state.clone();
        change(&mut next_state);

        self.instance.will_update(&self.props, &next_state)?;

        let output = self.instance.render(&self.props, &next_state)?;
        let prev_state = std::mem::replace(&mut self.state, next_state);
        let prev_props = self.props.clone();
        self.commit(output, prev_props, prev_state)
    }

    fn commit(
        &mut self,
        output: C::Output,
        prev_props: C::Props,
        prev_state: C::State,
    ) -> ComponentResult<&C::Output> {
        self.output = output;
        self.instance
            .did_update(&self.props, &self.state, &prev_props, &prev_state)?;
        Ok(&self.output)
    }

    /// Remove the instance, returning it to the caller.
    pub fn unmount(mut self) -> ComponentResult<C> {
        self.instance.will_unmount()?;
        Ok(self.instance)
    }

    /// Last rendered output.
    pub fn output(&self) -> &C::Output {
        &self.output
    }

    /// Current props.
    pub fn props(&self) -> &C::Props {
        &self.props
    }

    /// Current state.
    pub fn state(&self) -> &C::State {
        &self.state
    }

    /// The underlying instance.
    pub fn instance(&self) -> &C {
        &self.instance
    }

    /// Mutable access to the underlying instance.
    pub fn instance_mut(&mut self) -> &mut C {
        &mut self.instance
    }
}

impl<C> std::fmt::Debug for Mounted<C>
where
    C: Component,
    C::Props: std::fmt::Debug,
    C::State: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mounted")
            .field("props", &self.props)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
