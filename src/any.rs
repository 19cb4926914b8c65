use std::{
    any::{type_name, Any, TypeId},
    cmp::Ordering,
    fmt,
    sync::Arc,
};

/// Stable identity of a registered type: the `TypeId` plus its full path
/// for display. Two distinct types never compare equal.
#[derive(Debug, Clone, Copy)]
pub struct TypeInfo {
    pub name: &'static str,
    pub id: TypeId,
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeInfo {}

impl PartialOrd for TypeInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl TypeInfo {
    #[inline]
    #[must_use]
    pub fn of<T>() -> Self
    where
        T: ?Sized + 'static,
    {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn short_name(&self) -> &'static str {
        self.name.rsplit_once("::").map_or(self.name, |(_, name)| name)
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) type BoxAny = Box<dyn Any + Send + Sync>;
pub(crate) type RcAny = Arc<dyn Any + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::TypeInfo;

    struct Plain;

    #[test]
    fn test_short_name() {
        let info = TypeInfo::of::<Plain>();
        assert_eq!(info.short_name(), "Plain");
        assert!(info.name.ends_with("::Plain"));
    }

    #[test]
    fn test_identity() {
        assert_eq!(TypeInfo::of::<Plain>(), TypeInfo::of::<Plain>());
        assert_ne!(TypeInfo::of::<Plain>(), TypeInfo::of::<u8>());
    }
}
