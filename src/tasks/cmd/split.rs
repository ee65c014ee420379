/* ************************************************************************ **
** This file is part of trajsplit, and is licensed under EITHER the MIT     **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Splitting a trajectory into a training set and a test set.
//!
//! Every frame of the source ends up in exactly one of the two outputs,
//! and both outputs keep the frames in their original relative order.

use ::trajsplit_soa_ops::{Part, Partition};
use ::trajsplit_trajectory_io::{Frame, Trajectory};

use ::log::Level;
use ::rand::{Rng, SeedableRng, StdRng};
use ::std::fmt;
use ::std::path::{Path, PathBuf};
use ::std::str::FromStr;
use ::std::time::{Duration, Instant};

pub const DEFAULT_TRAINING_FRACTION: f64 = 0.75;

//--------------------------------------------------------------------------------------
// errors

#[derive(Debug, Fail)]
pub enum SplitError {
    /// Bad training fraction, empty trajectory, or unknown strategy.
    InvalidConfiguration(String),
    /// Output names cannot be derived from the source path.
    InvalidPath(PathBuf),
    /// Reading the source or writing an output failed.
    IoFailure {
        path: PathBuf,
        error: ::failure::Error,
    },
}

impl SplitError {
    fn io_failure(path: &Path, error: ::failure::Error) -> Self
    { SplitError::IoFailure { path: path.to_owned(), error } }
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitError::InvalidConfiguration(msg) => {
                write!(f, "invalid configuration: {}", msg)
            },
            SplitError::InvalidPath(path) => write!(
                f, "cannot derive output file names from '{}': the file name has no extension",
                path.display(),
            ),
            SplitError::IoFailure { path, error } => {
                write!(f, "I/O failure on '{}'", path.display())?;
                for cause in error.iter_chain() {
                    write!(f, ": {}", cause)?;
                }
                Ok(())
            },
        }
    }
}

//--------------------------------------------------------------------------------------
// configuration

/// How frames are assigned to the two subsets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// A uniformly random test set.
    Random,
    /// The first frames train, the last frames test.
    ///
    /// Suited to molecular dynamics, where it measures extrapolation in time.
    Time,
}

impl Default for Strategy {
    fn default() -> Self { Strategy::Random }
}

impl FromStr for Strategy {
    type Err = SplitError;

    fn from_str(s: &str) -> Result<Self, SplitError> {
        match s {
            "random" => Ok(Strategy::Random),
            "time" => Ok(Strategy::Time),
            _ => Err(SplitError::InvalidConfiguration(format!(
                "unsupported strategy {:?} (expected 'random' or 'time')", s,
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Random => write!(f, "random"),
            Strategy::Time => write!(f, "time"),
        }
    }
}

/// Parameters of a single split.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    pub source: PathBuf,
    /// Fraction of frames that go to the training set, in `(0, 1)`.
    pub training_fraction: f64,
    pub strategy: Strategy,
    /// Seeds the generator of the random strategy.
    pub seed: u64,
}

impl SplitConfig {
    pub fn new(source: impl Into<PathBuf>, seed: u64) -> Self
    {
        SplitConfig {
            source: source.into(),
            training_fraction: DEFAULT_TRAINING_FRACTION,
            strategy: Strategy::default(),
            seed,
        }
    }

    pub fn with_training_fraction(mut self, training_fraction: f64) -> Self
    { self.training_fraction = training_fraction; self }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self
    { self.strategy = strategy; self }
}

//--------------------------------------------------------------------------------------
// index bookkeeping

/// Label of the two regions of a split.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Subset { Train, Test }

impl fmt::Display for Subset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subset::Train => write!(f, "training"),
            Subset::Test => write!(f, "test"),
        }
    }
}

pub(crate) fn check_training_fraction(training_fraction: f64) -> Result<(), SplitError>
{
    // (written so that NaN fails too)
    if !(0.0 < training_fraction && training_fraction < 1.0) {
        return Err(SplitError::InvalidConfiguration(format!(
            "training fraction must lie strictly between 0 and 1, got {}", training_fraction,
        )));
    }
    Ok(())
}

/// Number of frames in the training and test sets.
///
/// The training count is `training_fraction * total_length` rounded half to even.
pub fn compute_split_sizes(
    total_length: usize,
    training_fraction: f64,
) -> Result<(usize, usize), SplitError>
{
    check_training_fraction(training_fraction)?;
    if total_length == 0 {
        return Err(SplitError::InvalidConfiguration("the trajectory has no frames".into()));
    }

    let train_count = round_half_even(training_fraction * total_length as f64) as usize;
    Ok((train_count, total_length - train_count))
}

fn round_half_even(x: f64) -> f64
{
    let floor = x.floor();
    let diff = x - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    }
}

/// `path/to/run.traj` becomes `path/to/run_train.traj` and `path/to/run_test.traj`.
pub fn derive_output_paths(source: &Path) -> Result<(PathBuf, PathBuf), SplitError>
{
    let invalid = || SplitError::InvalidPath(source.to_owned());

    let stem = source.file_stem().ok_or_else(invalid)?;
    let extension = source.extension().ok_or_else(invalid)?;
    if stem.is_empty() || extension.is_empty() {
        return Err(invalid());
    }

    let with_suffix = |suffix: &str| {
        let mut name = stem.to_owned();
        name.push(suffix);
        name.push(".");
        name.push(extension);
        source.with_file_name(name)
    };
    Ok((with_suffix("_train"), with_suffix("_test")))
}

/// Contiguous split: the first frames train, the rest test.
pub fn partition_by_time(
    total_length: usize,
    training_fraction: f64,
) -> Result<Part<Subset>, SplitError>
{
    let (train_count, _) = compute_split_sizes(total_length, training_fraction)?;
    Ok(Part::new(vec![
        (Subset::Train, (0..train_count).collect()),
        (Subset::Test, (train_count..total_length).collect()),
    ]).expect("BUG: contiguous ranges must form a partition"))
}

/// Uniformly random test set, drawn without replacement; the training set is the rest.
pub fn partition_random(
    total_length: usize,
    training_fraction: f64,
    rng: &mut impl Rng,
) -> Result<Part<Subset>, SplitError>
{
    let (_, test_count) = compute_split_sizes(total_length, training_fraction)?;

    let test = ::rand::sample(rng, 0..total_length, test_count);
    let mut in_test = vec![false; total_length];
    for &i in &test {
        in_test[i] = true;
    }
    let train = (0..total_length).filter(|&i| !in_test[i]).collect();

    // NOTE: `Part` sorts each region, so the draw order of `test` is forgotten here.
    Ok(Part::new(vec![
        (Subset::Train, train),
        (Subset::Test, test),
    ]).expect("BUG: a sample and its complement must form a partition"))
}

/// The generator used for a given `SplitConfig::seed`.
pub fn seeded_rng(seed: u64) -> StdRng
{
    let words = [(seed & 0xFFFF_FFFF) as usize, (seed >> 32) as usize];
    SeedableRng::from_seed(&words[..])
}

//--------------------------------------------------------------------------------------
// reporting

/// Destination for the progress messages of a split.
pub trait Sink {
    fn emit(&mut self, level: Level, message: &str);
}

/// Forwards everything to the `log` facade.
#[derive(Debug, Default, Copy, Clone)]
pub struct LogSink;

impl Sink for LogSink {
    fn emit(&mut self, level: Level, message: &str)
    { log!(level, "{}", message) }
}

/// Collects messages in memory.
impl Sink for Vec<(Level, String)> {
    fn emit(&mut self, level: Level, message: &str)
    { self.push((level, message.to_string())) }
}

impl<'a, S: Sink + ?Sized> Sink for &'a mut S {
    fn emit(&mut self, level: Level, message: &str)
    { (**self).emit(level, message) }
}

type TimingHook = Box<dyn FnMut(&str, Duration)>;

//--------------------------------------------------------------------------------------
// the splitter

/// Both halves of a split, as written to disk.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    /// Frames of the training set; its path is the file it was written to.
    pub train: Trajectory,
    pub test: Trajectory,
    /// Source indices of `train`, ascending.
    pub train_indices: Vec<usize>,
    /// Source indices of `test`, ascending.
    pub test_indices: Vec<usize>,
}

/// Splits one trajectory according to a `SplitConfig`.
///
/// The generator, the message sink and an optional timing hook are all
/// owned by the splitter, and can be replaced before running it.
pub struct TrajectorySplitter<R = StdRng, S = LogSink> {
    config: SplitConfig,
    rng: R,
    sink: S,
    timing_hook: Option<TimingHook>,
}

impl TrajectorySplitter {
    pub fn new(config: SplitConfig) -> Self
    {
        let rng = seeded_rng(config.seed);
        TrajectorySplitter { config, rng, sink: LogSink, timing_hook: None }
    }
}

impl<R, S> TrajectorySplitter<R, S> {
    /// Replace the generator seeded from `SplitConfig::seed`.
    pub fn with_rng<R2: Rng>(self, rng: R2) -> TrajectorySplitter<R2, S>
    {
        let TrajectorySplitter { config, rng: _, sink, timing_hook } = self;
        TrajectorySplitter { config, rng, sink, timing_hook }
    }

    pub fn with_sink<S2: Sink>(self, sink: S2) -> TrajectorySplitter<R, S2>
    {
        let TrajectorySplitter { config, rng, sink: _, timing_hook } = self;
        TrajectorySplitter { config, rng, sink, timing_hook }
    }

    /// Call `hook(operation, elapsed)` after each of `"load"`, `"split"` and `"write"`.
    pub fn on_timing(mut self, hook: impl FnMut(&str, Duration) + 'static) -> Self
    { self.timing_hook = Some(Box::new(hook)); self }

    pub fn config(&self) -> &SplitConfig
    { &self.config }

    pub fn sink(&self) -> &S
    { &self.sink }

    pub fn into_sink(self) -> S
    { self.sink }
}

impl<R: Rng, S: Sink> TrajectorySplitter<R, S> {
    /// Read the source trajectory, split it and write both outputs.
    pub fn run(&mut self) -> Result<SplitResult, SplitError>
    {
        // catch bad input before reading a potentially large file
        check_training_fraction(self.config.training_fraction)?;
        derive_output_paths(&self.config.source)?;

        let source = self.config.source.clone();
        let trajectory = {
            self.timed("load", |_| Trajectory::load(&source))
                .map_err(|e| SplitError::io_failure(&source, e))?
        };
        self.split(trajectory)
    }

    /// Split with the configured strategy.
    pub fn split(&mut self, trajectory: Trajectory) -> Result<SplitResult, SplitError>
    {
        match self.config.strategy {
            Strategy::Random => self.split_random(trajectory),
            Strategy::Time => self.split_by_time(trajectory),
        }
    }

    pub fn split_random(&mut self, trajectory: Trajectory) -> Result<SplitResult, SplitError>
    {
        let (len, fraction) = (trajectory.len(), self.config.training_fraction);
        let part = self.timed("split", |me| partition_random(len, fraction, &mut me.rng))?;
        self.write_outputs(trajectory, part)
    }

    pub fn split_by_time(&mut self, trajectory: Trajectory) -> Result<SplitResult, SplitError>
    {
        let (len, fraction) = (trajectory.len(), self.config.training_fraction);
        let part = self.timed("split", |_| partition_by_time(len, fraction))?;
        self.write_outputs(trajectory, part)
    }

    fn write_outputs(
        &mut self,
        trajectory: Trajectory,
        part: Part<Subset>,
    ) -> Result<SplitResult, SplitError>
    {
        let (train_path, test_path) = derive_output_paths(&self.config.source)?;
        let train_indices = part.indices_of(&Subset::Train).unwrap_or(&[]).to_vec();
        let test_indices = part.indices_of(&Subset::Test).unwrap_or(&[]).to_vec();

        self.info(format!("'{}' has {} frames", self.config.source.display(), trajectory.len()));
        self.info(format!("Training set: {} frames -> '{}'", train_indices.len(), train_path.display()));
        self.info(format!("Test set: {} frames -> '{}'", test_indices.len(), test_path.display()));

        let (mut train_frames, mut test_frames) = (vec![], vec![]);
        for (subset, frames) in trajectory.into_frames().into_partitions(&part) {
            match subset {
                Subset::Train => train_frames = frames,
                Subset::Test => test_frames = frames,
            }
        }
        let train = Trajectory::new(train_path, train_frames);
        let test = Trajectory::new(test_path, test_frames);

        self.timed("write", |_| {
            for output in &[&train, &test] {
                output.save(output.path())
                    .map_err(|e| SplitError::io_failure(output.path(), e))?;
            }
            Ok::<_, SplitError>(())
        })?;
        self.info(format!(
            "Wrote {} training and {} test frames", train.len(), test.len(),
        ));

        for (subset, output) in &[(Subset::Train, &train), (Subset::Test, &test)] {
            if let Some((lo, hi)) = energy_range(output.frames()) {
                self.debug(format!("{} energies range from {} to {}", subset, lo, hi));
            }
        }

        Ok(SplitResult { train, test, train_indices, test_indices })
    }

    fn timed<T>(&mut self, operation: &str, f: impl FnOnce(&mut Self) -> T) -> T
    {
        let start = Instant::now();
        let out = f(self);
        if let Some(hook) = self.timing_hook.as_mut() {
            hook(operation, start.elapsed());
        }
        out
    }

    fn info(&mut self, message: String)
    { self.sink.emit(Level::Info, &message) }

    fn debug(&mut self, message: String)
    { self.sink.emit(Level::Debug, &message) }
}

fn energy_range(frames: &[Frame]) -> Option<(f64, f64)>
{
    frames.iter()
        .filter_map(Frame::energy)
        .fold(None, |acc, e| match acc {
            None => Some((e, e)),
            Some((lo, hi)) => Some((f64::min(lo, e), f64::max(hi, e))),
        })
}
