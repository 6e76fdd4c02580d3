//! Typed lookups on task containers.
//!
//! A [`TaskContainer`] hands out type-erased domain objects. [`TaskContainerExt`]
//! adds the typed variants: the requested type is both the type token passed to
//! the container and the type the result is cast to.
//!
//! ```
//! use reifier_core::task_container::{DomainObject, TaskContainer, TaskContainerExt, TypeToken};
//! use reifier_core::{ReifierError, Result};
//! use std::sync::Arc;
//!
//! struct CopyTask {
//!     name: String,
//! }
//!
//! struct Tasks(Vec<(String, Arc<dyn DomainObject>)>);
//!
//! impl TaskContainer for Tasks {
//!     fn create(
//!         &self,
//!         name: &str,
//!         _token: TypeToken,
//!         _arguments: Vec<Arc<dyn DomainObject>>,
//!     ) -> Result<Arc<dyn DomainObject>> {
//!         Ok(Arc::new(CopyTask { name: name.to_string() }))
//!     }
//!
//!     fn get_by_name(&self, name: &str) -> Result<Arc<dyn DomainObject>> {
//!         self.find_by_name(name)
//!             .ok_or_else(|| ReifierError::unknown_domain_object(name, self.display_name()))
//!     }
//!
//!     fn find_by_name(&self, name: &str) -> Option<Arc<dyn DomainObject>> {
//!         self.0.iter().find(|(n, _)| n == name).map(|(_, task)| task.clone())
//!     }
//!
//!     fn display_name(&self) -> String {
//!         "task set".to_string()
//!     }
//! }
//!
//! let tasks = Tasks(vec![(
//!     "copy".to_string(),
//!     Arc::new(CopyTask { name: "copy".to_string() }) as Arc<dyn DomainObject>,
//! )]);
//! let copy: Arc<CopyTask> = tasks.get_by_name_as("copy", |copy: &CopyTask| assert_eq!(copy.name, "copy"))?;
//! assert!(tasks.find_by_name_as::<CopyTask>("missing")?.is_none());
//! # Ok::<(), ReifierError>(())
//! ```

use crate::error::{ReifierError, Result};
use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Runtime identity of a Rust type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

/// A value stored in a container.
///
/// Implemented for every `'static + Send + Sync` type. When calling these
/// methods through an `Arc<dyn DomainObject>`, dereference first
/// (`(*object).type_name()`), otherwise the `Arc` itself answers.
pub trait DomainObject: Any + Send + Sync {
    fn type_name(&self) -> &'static str;

    fn type_token(&self) -> TypeToken;

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> DomainObject for T {
    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn type_token(&self) -> TypeToken {
        TypeToken::of::<T>()
    }

    fn into_any_arc(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// A named collection of tasks.
#[cfg_attr(test, mockall::automock)]
pub trait TaskContainer {
    /// Creates a task of the given type, passing `arguments` to its constructor.
    fn create(
        &self,
        name: &str,
        token: TypeToken,
        arguments: Vec<Arc<dyn DomainObject>>,
    ) -> Result<Arc<dyn DomainObject>>;

    /// Fails with [`ReifierError::UnknownDomainObject`] when there is no such task.
    fn get_by_name(&self, name: &str) -> Result<Arc<dyn DomainObject>>;

    fn find_by_name(&self, name: &str) -> Option<Arc<dyn DomainObject>>;

    /// How the container names itself in error messages.
    fn display_name(&self) -> String;
}

/// Typed variants of the [`TaskContainer`] operations.
pub trait TaskContainerExt: TaskContainer {
    /// Creates a task of type `T`.
    fn create_typed<T: Any + Send + Sync>(
        &self,
        name: &str,
        arguments: Vec<Arc<dyn DomainObject>>,
    ) -> Result<Arc<T>> {
        let task = self.create(name, TypeToken::of::<T>(), arguments)?;
        cast(self, name, task)
    }

    /// Looks up the task `name`, casts it to `T` and runs `configure` on it.
    ///
    /// Fails when the task does not exist or has another type.
    fn get_by_name_as<T: Any + Send + Sync>(
        &self,
        name: &str,
        configure: impl FnOnce(&T),
    ) -> Result<Arc<T>> {
        let task = cast::<T, _>(self, name, self.get_by_name(name)?)?;
        configure(&*task);
        Ok(task)
    }

    /// Like [`Self::get_by_name_as`] without the action, and `None` when absent.
    fn find_by_name_as<T: Any + Send + Sync>(&self, name: &str) -> Result<Option<Arc<T>>> {
        self.find_by_name(name)
            .map(|task| cast(self, name, task))
            .transpose()
    }
}

impl<C: TaskContainer + ?Sized> TaskContainerExt for C {}

fn cast<T: Any + Send + Sync, C: TaskContainer + ?Sized>(
    container: &C,
    name: &str,
    task: Arc<dyn DomainObject>,
) -> Result<Arc<T>> {
    let actual = (*task).type_name();
    trace!(task = name, actual, requested = type_name::<T>(), "casting task");
    task.into_any_arc().downcast::<T>().map_err(|_| {
        ReifierError::illegal_state(format!(
            "Element '{}' of type '{}' from container '{}' cannot be cast to '{}'.",
            name,
            actual,
            container.display_name(),
            type_name::<T>()
        ))
    })
}
