//! Core component traits

use crate::ComponentResult;

/// Lifecycle contract of a stateful component.
///
/// The host owns the current props and state and passes them into every
/// hook. All hooks except [`render`](Component::render) and
/// [`initial_state`](Component::initial_state) are optional.
pub trait Component {
    /// Properties supplied by the parent
    type Props;
    /// Internal state, replaced wholesale on every state change
    type State: Clone;
    /// Rendered representation
    type Output;

    /// Build the state the instance starts with.
    fn initial_state(&self, props: &Self::Props) -> Self::State;

    /// Called once, before the first render.
    fn will_mount(&mut self, _props: &Self::Props, _state: &Self::State) -> ComponentResult<()> {
        Ok(())
    }

    /// Called once, after the first render.
    fn did_mount(&mut self, _props: &Self::Props, _state: &Self::State) -> ComponentResult<()> {
        Ok(())
    }

    /// Called before a prop-driven update with the incoming props.
    fn will_receive_props(
        &mut self,
        _props: &Self::Props,
        _next_props: &Self::Props,
    ) -> ComponentResult<()> {
        Ok(())
    }

    /// Called before every update, prop-driven or not.
    fn will_update(
        &mut self,
        _next_props: &Self::Props,
        _next_state: &Self::State,
    ) -> ComponentResult<()> {
        Ok(())
    }

    /// Called after every update with the values just rendered and the
    /// values they replaced.
    fn did_update(
        &mut self,
        _props: &Self::Props,
        _state: &Self::State,
        _prev_props: &Self::Props,
        _prev_state: &Self::State,
    ) -> ComponentResult<()> {
        Ok(())
    }

    /// Called when the instance is removed.
    fn will_unmount(&mut self) -> ComponentResult<()> {
        Ok(())
    }

    /// Render the component for the given props and state.
    fn render(&self, props: &Self::Props, state: &Self::State) -> ComponentResult<Self::Output>;
}

/// A component type: something the host can instantiate by name.
pub trait ComponentType {
    /// Instance type produced by [`create`](ComponentType::create)
    type Instance: Component;

    /// Declared display name of the type
    fn display_name(&self) -> &str;

    /// Create a fresh, unmounted instance.
    fn create(&self, props: &<Self::Instance as Component>::Props) -> Self::Instance;
}

/// A [`ComponentType`] backed by a constructor function.
pub struct Class<C: Component> {
    name: &'static str,
    constructor: fn(&C::Props) -> C,
}

impl<C: Component> Class<C> {
    /// Declare a component type with a name and constructor.
    pub fn new(name: &'static str, constructor: fn(&C::Props) -> C) -> Self {
        Self { name, constructor }
    }
}

impl<C: Component> Clone for Class<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            constructor: self.constructor,
        }
    }
}

impl<C: Component> std::fmt::Debug for Class<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Class").field("name", &self.name).finish()
    }
}

impl<C: Component> ComponentType for Class<C> {
    type Instance = C;

    fn display_name(&self) -> &str {
        self.name
    }

    fn create(&self, props: &C::Props) -> C {
        (self.constructor)(props)
    }
}
