use anyhow::Result;
use super::dataset::*;
use std::borrow::Cow;

pub trait DSetModify<F>: Sized {
  fn map(self, func: F) -> Mapped<Self, F>;
}

impl<D, F, I, O> DSetModify<F> for D
  where
    D: Dataset<Instance=I>,
    F: Fn(I) -> O + Sync,
{
  fn map(self, func: F) -> Mapped<D, F> { Mapped{ input: self, map: func } }
}

pub struct Mapped<D, F> {
  input: D,
  map: F,
}

impl<D, F, I> IdxNameMap for Mapped<D, F>
  where
    D: Dataset<Instance=I>,
{
  #[inline]
  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.input.name_to_index(name)
  }

  #[inline]
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.input.index_to_name(idx)
  }

  #[inline]
  fn len(&self) -> usize { self.input.len() }
}

impl<D, F, I, O> Dataset for Mapped<D, F>
  where
    D: Dataset<Instance=I>,
    F: Fn(I) -> O + Sync,
{
  type Instance = O;

  fn load_instance(&self, idx: usize) -> Result<O> {
    Ok((self.map)(self.input.load_instance(idx)?))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dataset::StdLayout;
  use crate::dataset::vrptw::{VrptwSolomon, VrptwInstance};
  use crate::dataset::tests::temp_layout;

  #[test]
  fn truncate_on_load() -> Result<()> {
    let root = temp_layout("mapped", &["A"]);
    let dset: StdLayout<VrptwSolomon> = StdLayout::with_root(&root, "solomon", "txt")?;
    let q = (&dset).map(|data: VrptwInstance| data.truncated(1));
    assert_eq!(q.len(), 1);
    assert_eq!(q.index_to_name(0)?, "A");
    assert_eq!(q.load_instance(0)?.num_customers(), 1);
    Ok(())
  }
}
