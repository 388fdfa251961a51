use super::domain::ProgramKey;

pub const MAX_COMPARED_PROGRAMS: usize = 3;
const MIN_COMPARED_PROGRAMS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ComparisonError {
    #[error("you can compare up to 3 programs at a time")]
    Full,
    #[error("select at least 2 programs to compare")]
    NotEnoughPrograms,
}

/// Side-by-side comparison shortlist kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComparisonList {
    entries: Vec<ProgramKey>,
}

impl ComparisonList {
    /// Adds the program, or removes it when already listed.
    pub fn toggle(&mut self, key: ProgramKey) -> Result<(), ComparisonError> {
        if let Some(position) = self.entries.iter().position(|entry| *entry == key) {
            self.entries.remove(position);
            return Ok(());
        }

        if self.entries.len() >= MAX_COMPARED_PROGRAMS {
            return Err(ComparisonError::Full);
        }

        self.entries.push(key);
        Ok(())
    }

    pub fn contains(&self, key: &ProgramKey) -> bool {
        self.entries.contains(key)
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_COMPARED_PROGRAMS
    }

    /// Entries ready for display; fails while fewer than two are listed.
    pub fn ready(&self) -> Result<&[ProgramKey], ComparisonError> {
        if self.entries.len() < MIN_COMPARED_PROGRAMS {
            return Err(ComparisonError::NotEnoughPrograms);
        }
        Ok(&self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
