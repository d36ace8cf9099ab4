use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use nix::fcntl::{flock, FlockArg};
use time::{Duration, PrimitiveDateTime};
use crate::visitor::clock::Clock;
use crate::visitor::error::VisitorLogError;
use crate::visitor::record::{truncate_to_second, VisitorRecord};

pub const MIN_SPACING: Duration = Duration::minutes(5);

/// Append-only visitor store backed by a flat text file.
#[derive(Debug, Clone)]
pub struct VisitorLog {
    path: PathBuf,
}

impl VisitorLog {
    pub fn new(path: impl Into<PathBuf>) -> VisitorLog {
        VisitorLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the store file if it does not exist yet. An existing store is
    /// not opened at all, so a read-only store still passes.
    pub fn ensure_store(&self) -> Result<(), VisitorLogError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| VisitorLogError::io(e, parent))?;
        }

        match OpenOptions::new().write(true).create_new(true).open(&self.path) {
            Ok(_) => {
                debug!("created visitor store {}", self.path.display());
                Ok(())
            },
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(e) => Err(VisitorLogError::io(e, &self.path)),
        }
    }

    /// Most recent record, or `None` when the store is absent or empty.
    pub fn last_visitor(&self) -> Result<Option<VisitorRecord>, VisitorLogError> {
        match self.read_store()? {
            Some(content) => last_record(&content),
            None => Ok(None),
        }
    }

    /// Every record in append order.
    pub fn records(&self) -> Result<Vec<VisitorRecord>, VisitorLogError> {
        let content = match self.read_store()? {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };

        let mut records: Vec<VisitorRecord> = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            records.push(VisitorRecord::parse_line(line)?);
        }
        Ok(records)
    }

    /// Appends `(name, now)` unless `name` repeats the last visitor or the
    /// last visit was less than [`MIN_SPACING`] ago. The duplicate check wins
    /// over the spacing check.
    pub fn submit(&self, name: &str, now: PrimitiveDateTime) -> Result<VisitorRecord, VisitorLogError> {
        if name.is_empty() {
            info!("rejected empty visitor name");
            return Err(VisitorLogError::EmptyName);
        }
        let now = truncate_to_second(now);

        self.ensure_store()?;

        let mut reader = fs::File::open(&self.path).map_err(|e| VisitorLogError::io(e, &self.path))?;

        // held on the read handle until it is dropped, across the append below
        flock(reader.as_raw_fd(), FlockArg::LockExclusive)
            .map_err(|e| VisitorLogError::Lock { source: e, path: self.path.clone() })?;

        let mut content = String::new();
        reader.read_to_string(&mut content).map_err(|e| VisitorLogError::io(e, &self.path))?;

        if let Some(last) = last_record(&content)? {
            if last.name == name {
                info!("rejected {:?}: same as previous visitor", name);
                return Err(VisitorLogError::DuplicateConsecutiveVisitor { name: String::from(name) });
            }

            let elapsed = now - last.timestamp;
            if elapsed < MIN_SPACING {
                info!("rejected {:?}: only {:?} since {:?}", name, elapsed, last.name);
                return Err(VisitorLogError::TooEarly { elapsed, required: MIN_SPACING });
            }
        }

        let record = VisitorRecord::new(name, now);
        let mut writer = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| VisitorLogError::io(e, &self.path))?;
        append_line(&mut writer, &content, &record).map_err(|e| VisitorLogError::io(e, &self.path))?;
        drop(reader);

        info!("visitor added: {}", record);
        Ok(record)
    }

    pub fn submit_with<C: Clock + ?Sized>(&self, name: &str, clock: &C) -> Result<VisitorRecord, VisitorLogError> {
        let now = clock.now()?;
        self.submit(name, now)
    }

    fn read_store(&self) -> Result<Option<String>, VisitorLogError> {
        debug!("reading visitor store {}", self.path.display());
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(VisitorLogError::io(e, &self.path)),
        }
    }
}

fn last_record(content: &str) -> Result<Option<VisitorRecord>, VisitorLogError> {
    match content.trim_end().lines().last() {
        Some(line) if !line.is_empty() => Ok(Some(VisitorRecord::parse_line(line)?)),
        _ => Ok(None),
    }
}

fn append_line<W: Write>(w: &mut W, content: &str, record: &VisitorRecord) -> io::Result<()> {
    let mut line = String::new();
    if !content.is_empty() && !content.ends_with('\n') {
        line.push('\n');
    }
    line.push_str(&record.to_string());
    line.push('\n');

    debug!("appending {:?}", line);
    w.write_all(line.as_bytes())?;
    w.flush()
}
