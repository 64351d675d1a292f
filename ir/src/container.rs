//! Container descriptors held by the whole-program registry.
//!
//! Data nodes never own storage; they name a [`Container`] registered in the
//! [`Program`](crate::Program). Several nodes, possibly in different states,
//! may name the same container.

use bon::bon;
use smallvec::SmallVec;

/// Container shape: extent per dimension.
///
/// Inline capacity of 4 covers the common ranks without heap allocation.
pub type Shape = SmallVec<[i64; 4]>;

/// Where a container lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum StorageType {
    /// Chosen by the backend.
    #[default]
    Default,
    /// Host heap memory.
    CpuHeap,
    /// Page-locked host memory.
    CpuPinned,
    /// Device global memory.
    GpuGlobal,
    /// Device shared (block-local) memory.
    GpuShared,
    /// Registers.
    Register,
}

/// Concrete container flavor. Two containers are interchangeable only if
/// their kinds match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ContainerKind {
    /// Dense multidimensional array.
    #[default]
    Array,
    /// FIFO stream buffer.
    Stream,
    /// Single value.
    Scalar,
}

/// Element type tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
pub enum ElementType {
    Bool,
    Int32,
    Int64,
    #[default]
    Float32,
    Float64,
}

impl ElementType {
    pub fn bytes(&self) -> usize {
        match self {
            Self::Bool => 1,
            Self::Int32 | Self::Float32 => 4,
            Self::Int64 | Self::Float64 => 8,
        }
    }
}

/// Descriptor of a named storage location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub shape: Shape,
    pub element: ElementType,
    pub storage: StorageType,
    pub kind: ContainerKind,
    /// Compiler-introduced; eligible for elimination when provably single-use.
    pub transient: bool,
}

#[bon]
impl Container {
    /// Build a descriptor; everything but the shape has a default.
    ///
    /// ```rust
    /// # use rill_ir::{Container, StorageType};
    /// let tmp = Container::builder().shape(vec![3, 3]).transient(true).storage(StorageType::GpuGlobal).build();
    /// assert_eq!(tmp.total_size(), 9);
    /// ```
    #[builder]
    pub fn new(
        #[builder(into)] shape: Shape,
        #[builder(default)] element: ElementType,
        #[builder(default)] storage: StorageType,
        #[builder(default)] kind: ContainerKind,
        #[builder(default)] transient: bool,
    ) -> Self {
        Self { shape, element, storage, kind, transient }
    }
}

impl Container {
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Product of all extents.
    pub fn total_size(&self) -> i64 {
        self.shape.iter().product()
    }

    /// Same storage class and same container kind.
    pub fn is_interchangeable_with(&self, other: &Container) -> bool {
        self.storage == other.storage && self.kind == other.kind
    }
}
