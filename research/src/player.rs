use rustc_hash::FxHashMap;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PlayerId(usize);

impl PlayerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Dense ids for player names, in order of first appearance.
#[derive(Default)]
pub struct PlayerIds {
    inner: FxHashMap<Box<str>, PlayerId>,
    names: Vec<Box<str>>,
}

impl PlayerIds {
    pub fn get_or_insert(&mut self, name: String) -> PlayerId {
        if let Some(&id) = self.inner.get(name.as_str()) {
            return id;
        }
        let id = PlayerId(self.names.len());
        let name = name.into_boxed_str();
        self.names.push(name.clone());
        self.inner.insert(name, id);
        id
    }

    pub fn get(&self, name: &str) -> Option<PlayerId> {
        self.inner.get(name).copied()
    }

    pub fn name(&self, PlayerId(id): PlayerId) -> &str {
        &self.names[id]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.names.len()).map(PlayerId)
    }
}

pub struct ByPlayerId<T> {
    inner: Vec<Option<T>>,
}

impl<T> Default for ByPlayerId<T> {
    fn default() -> Self {
        ByPlayerId { inner: Vec::new() }
    }
}

impl<T> ByPlayerId<T> {
    pub fn get(&self, PlayerId(id): PlayerId) -> Option<&T> {
        match self.inner.get(id) {
            Some(Some(t)) => Some(t),
            _ => None,
        }
    }

    pub fn set(&mut self, PlayerId(id): PlayerId, value: T) {
        if self.inner.len() <= id {
            self.inner.resize_with(id + 1, || None);
        }
        self.inner[id] = Some(value);
    }
}
