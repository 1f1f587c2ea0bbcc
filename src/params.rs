//! Named control values bridged to an external driver.
//!
//! Several controllers may share one store. Each controller only writes the
//! parameters it added itself; a name that already existed belongs to whoever
//! created it.

use fnv::FnvHashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    Float,
    Bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
}

impl ParamValue {
    #[inline]
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Bool(_) => ParamKind::Bool,
        }
    }

    fn default_for(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Float => ParamValue::Float(0.0),
            ParamKind::Bool => ParamValue::Bool(false),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ControlParameter {
    pub name: String,
    pub value: ParamValue,
}

pub trait ParameterStore {
    fn find(&self, name: &str) -> Option<ParamHandle>;
    /// Adds `name` with a default value, or returns the existing handle if
    /// the name is already registered.
    fn add(&mut self, name: &str, kind: ParamKind) -> ParamHandle;
    fn read_float(&self, handle: ParamHandle) -> Option<f32>;
    fn write_float(&mut self, handle: ParamHandle, value: f32) -> bool;
    fn read_bool(&self, handle: ParamHandle) -> Option<bool>;
    fn write_bool(&mut self, handle: ParamHandle, value: bool) -> bool;
}

/// Hash-indexed store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryParameterStore {
    index: FnvHashMap<String, ParamHandle>,
    params: Vec<ControlParameter>,
}

impl MemoryParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ControlParameter> {
        self.index.get(name).and_then(|h| self.params.get(h.0))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ControlParameter> {
        self.params.iter()
    }

    fn slot_mut(&mut self, handle: ParamHandle) -> Option<&mut ParamValue> {
        self.params.get_mut(handle.0).map(|p| &mut p.value)
    }
}

impl ParameterStore for MemoryParameterStore {
    fn find(&self, name: &str) -> Option<ParamHandle> {
        self.index.get(name).copied()
    }

    fn add(&mut self, name: &str, kind: ParamKind) -> ParamHandle {
        if let Some(h) = self.index.get(name) {
            return *h;
        }
        let handle = ParamHandle(self.params.len());
        self.params.push(ControlParameter {
            name: name.to_owned(),
            value: ParamValue::default_for(kind),
        });
        self.index.insert(name.to_owned(), handle);
        log::debug!("params: added {} ({:?})", name, kind);
        handle
    }

    fn read_float(&self, handle: ParamHandle) -> Option<f32> {
        match self.params.get(handle.0)?.value {
            ParamValue::Float(v) => Some(v),
            ParamValue::Bool(_) => None,
        }
    }

    fn write_float(&mut self, handle: ParamHandle, value: f32) -> bool {
        match self.slot_mut(handle) {
            Some(ParamValue::Float(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    fn read_bool(&self, handle: ParamHandle) -> Option<bool> {
        match self.params.get(handle.0)?.value {
            ParamValue::Bool(v) => Some(v),
            ParamValue::Float(_) => None,
        }
    }

    fn write_bool(&mut self, handle: ParamHandle, value: bool) -> bool {
        match self.slot_mut(handle) {
            Some(ParamValue::Bool(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }
}

/// A parameter this controller reads or writes, with the last value seen.
#[derive(Clone, Debug)]
pub(crate) struct BoundParam<T> {
    pub name: String,
    pub handle: Option<ParamHandle>,
    /// False when another owner registered the name first.
    pub owned: bool,
    pub cached: T,
}

impl<T> BoundParam<T> {
    pub fn new(name: String, cached: T) -> Self {
        Self {
            name,
            handle: None,
            owned: false,
            cached,
        }
    }
}

impl BoundParam<f32> {
    /// Claims `name` as an output; an existing registration is left to its owner.
    pub fn bind_output(&mut self, store: &mut dyn ParameterStore) {
        match store.find(&self.name) {
            Some(h) => {
                log::info!("params: '{}' already registered, not writing it", self.name);
                self.handle = Some(h);
                self.owned = false;
            }
            None => {
                self.handle = Some(store.add(&self.name, ParamKind::Float));
                self.owned = true;
            }
        }
    }

    pub fn publish(&mut self, store: &mut dyn ParameterStore, value: f32) {
        self.cached = value;
        if !self.owned {
            return;
        }
        if let Some(h) = self.handle {
            if !store.write_float(h, value) {
                log::warn!("params: write to '{}' rejected", self.name);
            }
        }
    }
}

impl BoundParam<bool> {
    /// Binds `name` as an input, registering it if no one has yet.
    pub fn bind_input(&mut self, store: &mut dyn ParameterStore) {
        let handle = match store.find(&self.name) {
            Some(h) => h,
            None => {
                let h = store.add(&self.name, ParamKind::Bool);
                store.write_bool(h, self.cached);
                self.owned = true;
                h
            }
        };
        self.handle = Some(handle);
    }

    /// Latest driver value, falling back to the cached one when absent.
    pub fn refresh(&mut self, store: &dyn ParameterStore) -> bool {
        let fresh = self
            .handle
            .or_else(|| store.find(&self.name))
            .and_then(|h| store.read_bool(h));
        match fresh {
            Some(v) => self.cached = v,
            None => log::debug!("params: '{}' unavailable, using {}", self.name, self.cached),
        }
        self.cached
    }
}
