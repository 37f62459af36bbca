use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use crate::{Error, Map};
use std::borrow::Cow;


pub trait IdxNameMap {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>>;

  fn name_to_index(&self, name: &str) -> Result<usize>;

  fn len(&self) -> usize;

  fn check_idx(&self, idx: usize) -> Result<()> {
    if self.len() <= idx {
      Err(Error::IndexOutOfRange { index: idx, len: self.len() }.into())
    } else {
      Ok(())
    }
  }
}


impl<'a, D: IdxNameMap> IdxNameMap for &'a D {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    D::index_to_name(self, idx)
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    D::name_to_index(self, name)
  }

  fn len(&self) -> usize {
    D::len(self)
  }
}

pub trait Dataset: IdxNameMap + Sync {
  type Instance;
  fn load_instance(&self, idx: usize) -> Result<Self::Instance>;
}


impl<'a, D: Dataset> Dataset for &'a D {
  type Instance = D::Instance;

  fn load_instance(&self, idx: usize) -> Result<Self::Instance> {
    D::load_instance(self, idx)
  }
}


/// A Standard Layout Dataset: a directory containing instance files and `INDEX.txt` index file.
/// The index file contains a new-line separated list of instance names, which acts as a map from index -> name.
/// Each instance file is named `NAME.SUFFIX`.  Collections normally live under [`data_root`].
pub struct StdLayout<D> {
  _marker: PhantomData<D>,
  name_order: Vec<String>,
  name_to_idx_map: Map<String, usize>,
  dir: PathBuf,
  suffix: String,
}


/// Root directory of the benchmark collections, taken from `$DATA_ROOT`.
pub fn data_root() -> Result<PathBuf> {
  std::env::var_os("DATA_ROOT")
    .map(PathBuf::from)
    .context("environment variable DATA_ROOT must be defined")
}

impl<D> StdLayout<D> {
  /// Opens `root/dir`.
  pub fn with_root(root: impl AsRef<Path>, dir: impl AsRef<Path>, suffix: &str) -> Result<StdLayout<D>> {
    let dir = root.as_ref().join(dir);
    let ctx = format!("try read directory {:?}", &dir);
    let dir = dir.canonicalize().context(ctx)?;

    let contents = std::fs::read_to_string(dir.join("INDEX.txt"))
      .with_context(|| format!("missing INDEX.txt in {:?}", &dir))?;
    let name_order: Vec<String> = contents.split_whitespace().map(|s| s.trim().to_string()).collect();
    let name_to_idx_map: Map<_, _> = name_order.iter().enumerate().map(|(i, s)| (s.clone(), i)).collect();

    Ok(StdLayout {
      _marker: PhantomData {},
      name_order,
      name_to_idx_map,
      dir,
      suffix: suffix.to_string(),
    })
  }

  fn instance_path(&self, idx: usize) -> Result<(Cow<str>, PathBuf)> {
    let instance = self.index_to_name(idx)?;
    let mut path = self.dir.join(&*instance);
    path.set_extension(&self.suffix);
    Ok((instance, path))
  }
}

impl<D> IdxNameMap for StdLayout<D> {
  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    self.check_idx(idx)?;
    Ok(Cow::Borrowed(&self.name_order[idx]))
  }

  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.name_to_idx_map.get(name)
      .copied()
      .ok_or_else(|| Error::UnknownInstanceName(name.to_string()).into())
  }

  fn len(&self) -> usize { self.name_order.len() }
}


/// Several datasets indexed back to back, as if they were one.
pub struct DSetCollection<I: 'static> {
  members: Vec<Box<dyn Dataset<Instance=I>>>,
  /// Collection index of the first instance of each member
  offsets: Vec<usize>,
  name_to_idx: Map<String, usize>,
  length: usize,
}

impl<I> DSetCollection<I> {
  /// Fails if two members share an instance name.
  pub fn new(members: Vec<Box<dyn Dataset<Instance=I>>>) -> Result<DSetCollection<I>> {
    let mut offsets = Vec::with_capacity(members.len());
    let mut name_to_idx = Map::default();
    let mut length = 0;

    for dset in &members {
      offsets.push(length);
      for i in 0..dset.len() {
        let name = dset.index_to_name(i)?.into_owned();
        if name_to_idx.contains_key(&name) {
          anyhow::bail!("duplicate instance name in collection: {}", name);
        }
        name_to_idx.insert(name, length + i);
      }
      length += dset.len();
    }

    Ok(DSetCollection { members, offsets, name_to_idx, length })
  }

  /// The member holding `idx`, and the index within that member.
  fn locate(&self, idx: usize) -> Result<(&dyn Dataset<Instance=I>, usize)> {
    self.check_idx(idx)?;
    // empty members share their offset with the next one, so take the last match
    let m = self.offsets.partition_point(|&start| start <= idx) - 1;
    Ok((self.members[m].as_ref(), idx - self.offsets[m]))
  }
}

impl<I> IdxNameMap for DSetCollection<I> {
  fn name_to_index(&self, name: &str) -> Result<usize> {
    self.name_to_idx.get(name)
      .copied()
      .ok_or_else(|| Error::UnknownInstanceName(name.to_string()).into())
  }

  fn index_to_name(&self, idx: usize) -> Result<Cow<str>> {
    let (dset, idx) = self.locate(idx)?;
    dset.index_to_name(idx)
  }

  fn len(&self) -> usize { self.length }
}

impl<I> Dataset for DSetCollection<I> {
  type Instance = I;

  fn load_instance(&self, idx: usize) -> Result<I> {
    let (dset, idx) = self.locate(idx)?;
    dset.load_instance(idx)
  }
}


pub mod vrptw;


#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use super::vrptw::{VrptwInstance, VrptwSolomon};

  pub(crate) const SMALL: &str = "SMALL
VEHICLE
NUMBER     CAPACITY
  2         50
CUSTOMER
CUST NO.  XCOORD.   YCOORD.    DEMAND   READY TIME  DUE DATE   SERVICE   TIME
    0       0          0          0          0        500          0
    1       3          4         10         20         30          1
    2       6          8         20        100        200          1
";

  /// Lays out a throwaway dataset directory with the given instances (all `SMALL`).
  pub(crate) fn temp_layout(tag: &str, names: &[&str]) -> PathBuf {
    let root = std::env::temp_dir().join(format!("instances-{}-{}", tag, std::process::id()));
    let dir = root.join("solomon");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("INDEX.txt"), names.join("\n")).unwrap();
    for n in names {
      std::fs::write(dir.join(format!("{}.txt", n)), SMALL).unwrap();
    }
    root
  }

  fn member(root: &Path) -> Result<Box<dyn Dataset<Instance=VrptwInstance>>> {
    let dset: StdLayout<VrptwSolomon> = StdLayout::with_root(root, "solomon", "txt")?;
    Ok(Box::new(dset))
  }

  #[test]
  fn std_layout_lookup() -> Result<()> {
    let root = temp_layout("lookup", &["A", "B"]);
    let dset: StdLayout<VrptwSolomon> = StdLayout::with_root(&root, "solomon", "txt")?;
    assert_eq!(dset.len(), 2);
    assert_eq!(dset.name_to_index("B")?, 1);
    assert_eq!(dset.index_to_name(0)?, "A");
    let data: VrptwInstance = dset.load_instance(1)?;
    assert_eq!(data.id, "B");
    assert_eq!(data.num_customers(), 2);
    Ok(())
  }

  #[test]
  fn lookup_errors_carry_the_key() -> Result<()> {
    let root = temp_layout("keys", &["A", "B"]);
    let dset: StdLayout<VrptwSolomon> = StdLayout::with_root(&root, "solomon", "txt")?;
    let err = dset.name_to_index("C").unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::UnknownInstanceName("C".to_string())));
    assert_eq!(err.to_string(), "unknown instance C");
    let err = dset.index_to_name(2).unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::IndexOutOfRange { index: 2, len: 2 }));
    Ok(())
  }

  #[test]
  fn collection_offsets() -> Result<()> {
    let r1 = temp_layout("coll1", &["A", "B"]);
    let r2 = temp_layout("coll2", &["C"]);
    let r3 = temp_layout("coll3", &[]);
    let coll = DSetCollection::new(vec![member(&r1)?, member(&r3)?, member(&r2)?])?;
    assert_eq!(coll.len(), 3);
    assert_eq!(coll.name_to_index("C")?, 2);
    assert_eq!(coll.index_to_name(1)?, "B");
    assert_eq!(coll.load_instance(2)?.id, "C");
    let err = coll.load_instance(3).unwrap_err();
    assert_eq!(err.downcast_ref::<Error>(), Some(&Error::IndexOutOfRange { index: 3, len: 3 }));
    assert!(coll.name_to_index("D").is_err());
    Ok(())
  }

  #[test]
  fn collection_rejects_duplicates() -> Result<()> {
    let r1 = temp_layout("dup1", &["A"]);
    let r2 = temp_layout("dup2", &["A"]);
    assert!(DSetCollection::new(vec![member(&r1)?, member(&r2)?]).is_err());
    Ok(())
  }
}
