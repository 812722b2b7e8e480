//! Scripted walk-throughs of growth, copy, move and assignment.
//!
//! Each scenario builds its own arrays, prints them, and checks the result
//! it expects. A failed expectation is an error, not a panic.

use std::sync::Arc;

use anyhow::{bail, ensure, Context, Result};
use clap::ValueEnum;
use raii_vec::{Console, DynamicArray, SharedNarrator};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Scenario {
    /// Construct with a label and push past the first slot
    Construct,
    /// Resize explicitly, then overflow into geometric growth
    Resize,
    /// Copy an array and mutate both sides
    Copy,
    /// Element-wise addition, including a rejected shape
    Add,
    /// Copy assignment through a by-value swap
    CopyAssign,
    /// Move assignment from a temporary and from a named array
    MoveAssign,
    /// Every scenario above, in order
    All,
}

impl Scenario {
    pub const ORDER: [Scenario; 6] = [
        Scenario::Construct,
        Scenario::Resize,
        Scenario::Copy,
        Scenario::Add,
        Scenario::CopyAssign,
        Scenario::MoveAssign,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Scenario::Construct => "standard constructor",
            Scenario::Resize => "resizing",
            Scenario::Copy => "copy",
            Scenario::Add => "addition",
            Scenario::CopyAssign => "copy assignment",
            Scenario::MoveAssign => "move assignment",
            Scenario::All => "all scenarios",
        }
    }

    /// Replace `All` with the full ordered list and drop repeats.
    pub fn expand(requested: &[Scenario]) -> Vec<Scenario> {
        let mut out = Vec::new();
        let flat = requested.iter().flat_map(|&s| {
            if s == Scenario::All {
                Self::ORDER.to_vec()
            } else {
                vec![s]
            }
        });
        for item in flat {
            if !out.contains(&item) {
                out.push(item);
            }
        }
        out
    }
}

/// Final shape of one array at the end of a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub label: String,
    pub capacity: usize,
    pub items: Vec<i64>,
}

impl Snapshot {
    fn of(arr: &DynamicArray<i64>) -> Self {
        Self {
            label: arr.label().to_string(),
            capacity: arr.capacity(),
            items: arr.to_vec(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Report {
    pub scenario: Scenario,
    pub arrays: Vec<Snapshot>,
}

impl Report {
    /// Look up an array by its label.
    pub fn array(&self, label: &str) -> Option<&Snapshot> {
        self.arrays.iter().find(|s| s.label == label)
    }
}

pub struct Runner {
    narrator: Option<SharedNarrator>,
    initial_capacity: usize,
}

impl Runner {
    pub fn new(verbose: u8, initial_capacity: usize) -> Self {
        let narrator: Option<SharedNarrator> = if verbose > 0 {
            Some(Arc::new(Console))
        } else {
            None
        };
        Self {
            narrator,
            initial_capacity,
        }
    }

    /// Use a custom narrator instead of the console.
    pub fn with_narrator(mut self, narrator: SharedNarrator) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn run_all(&self, requested: &[Scenario]) -> Result<Vec<Report>> {
        Scenario::expand(requested)
            .into_iter()
            .map(|s| {
                println!("\n--- Test {} ---", s.title());
                self.run(s).with_context(|| format!("Scenario failed: {}", s.title()))
            })
            .collect()
    }

    pub fn run(&self, scenario: Scenario) -> Result<Report> {
        let arrays = match scenario {
            Scenario::Construct => self.construct()?,
            Scenario::Resize => self.resize()?,
            Scenario::Copy => self.copy()?,
            Scenario::Add => self.add()?,
            Scenario::CopyAssign => self.copy_assign()?,
            Scenario::MoveAssign => self.move_assign()?,
            Scenario::All => bail!("`all` must be expanded before running"),
        };
        Ok(Report { scenario, arrays })
    }

    fn array(&self, label: &str, capacity: usize) -> DynamicArray<i64> {
        let arr = DynamicArray::labeled(label, capacity);
        match &self.narrator {
            Some(n) => arr.with_narrator(n.clone()),
            None => arr,
        }
    }

    fn push_all(arr: &mut DynamicArray<i64>, items: &[i64]) -> Result<()> {
        for &item in items {
            arr.try_push(item)
                .with_context(|| format!("push {item} into {}", arr.label()))?;
        }
        Ok(())
    }

    /// nigel: [3, 56]
    fn nigel(&self) -> Result<DynamicArray<i64>> {
        let mut n = self.array("nigel", 0);
        Self::push_all(&mut n, &[3, 56])?;
        Ok(n)
    }

    /// nigel grown to four items and mary, a copy of the two-item nigel.
    fn nigel_and_mary(&self) -> Result<(DynamicArray<i64>, DynamicArray<i64>)> {
        let mut n = self.nigel()?;
        let mut m = n.clone();
        m.rename("mary");
        Self::push_all(&mut m, &[9, 7])?;
        Self::push_all(&mut n, &[1, 2])?;
        Ok((n, m))
    }

    fn construct(&self) -> Result<Vec<Snapshot>> {
        let mut n = self.array("nigel", 0);
        println!("{n}");
        Self::push_all(&mut n, &[3, 56])?;
        println!("{n}");

        ensure!(n[..] == [3, 56], "unexpected contents {:?}", &n[..]);
        ensure!(n.capacity() == 3, "expected capacity 3, got {}", n.capacity());
        Ok(vec![Snapshot::of(&n)])
    }

    fn resize(&self) -> Result<Vec<Snapshot>> {
        let mut k = self.array("kelly", 0);
        println!("{k}");
        k.resize(self.initial_capacity)
            .with_context(|| format!("resize kelly to {}", self.initial_capacity))?;
        println!("{k}");
        let items: Vec<i64> = (1..=self.initial_capacity.max(1) as i64 + 1).collect();
        Self::push_all(&mut k, &items)?;
        println!("{k}");

        ensure!(k[..] == items[..], "unexpected contents {:?}", &k[..]);
        let grown = 2 * self.initial_capacity.max(1) + 1;
        ensure!(
            k.capacity() == grown,
            "expected capacity {grown} after overflow, got {}",
            k.capacity()
        );
        Ok(vec![Snapshot::of(&k)])
    }

    fn copy(&self) -> Result<Vec<Snapshot>> {
        let (n, m) = self.nigel_and_mary()?;
        println!("{m}");
        println!("{n}");

        ensure!(n[..] == [3, 56, 1, 2], "copy leaked into source: {:?}", &n[..]);
        ensure!(m[..] == [3, 56, 9, 7], "source leaked into copy: {:?}", &m[..]);
        Ok(vec![Snapshot::of(&n), Snapshot::of(&m)])
    }

    fn add(&self) -> Result<Vec<Snapshot>> {
        let (n, m) = self.nigel_and_mary()?;
        let mut o = &n + &m;
        o.rename("oscar");
        println!("{o}");
        ensure!(o[..] == [6, 112, 10, 9], "unexpected sum {:?}", &o[..]);

        let short = self.nigel()?;
        let rejected = n.elementwise_add(&short);
        println!("{rejected}");
        ensure!(rejected.is_empty(), "mismatched add should be empty");
        Ok(vec![Snapshot::of(&o)])
    }

    fn copy_assign(&self) -> Result<Vec<Snapshot>> {
        let (n, mut m) = self.nigel_and_mary()?;
        let mut o = &n + &m;
        o.rename("oscar");
        println!("{m}");
        m.assign_copy(&o);
        println!("{m}");

        ensure!(m == o, "copy assignment should match the source");
        ensure!(m.as_ptr() != o.as_ptr(), "copy assignment must not share a buffer");
        Ok(vec![Snapshot::of(&m), Snapshot::of(&o)])
    }

    fn move_assign(&self) -> Result<Vec<Snapshot>> {
        let (mut n, m) = self.nigel_and_mary()?;
        let mut o = &n + &m;
        o.rename("oscar");

        let mut p = self.array("pelle", 0);
        p.assign(&n + &o);
        println!("{n}");
        println!("{o}");
        println!("{p}");
        ensure!(p[..] == [9, 168, 11, 11], "unexpected sum {:?}", &p[..]);

        let mut q = self.array("quinn", 0);
        q.assign_move(&mut n);
        println!("{q}");
        println!("{n}");
        ensure!(n.is_empty() && n.capacity() == 0, "moved-from array should be empty");
        ensure!(q[..] == [3, 56, 1, 2], "unexpected contents {:?}", &q[..]);
        Ok(vec![Snapshot::of(&p), Snapshot::of(&q), Snapshot::of(&n)])
    }
}
