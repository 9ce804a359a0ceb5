use tankobon_extract::models::{FileType, ReleaseDescriptor, ReleaseFile};

/// Counts of archive formats and release types in a folder or a batch.
///
/// Used to keep light-novel releases out of manga folders (and the other
/// way round) when two series share a name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profile {
    pub manga: usize,
    pub novels: usize,
    pub volumes: usize,
    pub chapters: usize,
}

impl Profile {
    pub fn of<'a>(descriptors: impl IntoIterator<Item = &'a ReleaseDescriptor>) -> Self {
        descriptors.into_iter().fold(Self::default(), |mut profile, descriptor| {
            profile.add(&descriptor.file);
            profile
        })
    }

    pub fn add(&mut self, file: &ReleaseFile) {
        match file.extension.is_novel() {
            true => self.novels += 1,
            false => self.manga += 1,
        }
        match file.file_type {
            FileType::Volume => self.volumes += 1,
            FileType::Chapter => self.chapters += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.manga + self.novels
    }

    /// Whether both profiles are dominated, to at least `percentage`
    /// percent, by the same format and by the same release type. An empty
    /// profile is compatible with anything.
    pub fn compatible(&self, other: &Self, percentage: u8) -> bool {
        if self.total() == 0 || other.total() == 0 {
            return true;
        }
        let dominant = |part: fn(&Self) -> usize| {
            share(part(self), self.total()) >= f64::from(percentage)
                && share(part(other), other.total()) >= f64::from(percentage)
        };
        let same_format = dominant(|p| p.manga) || dominant(|p| p.novels);
        let same_type = dominant(|p| p.volumes) || dominant(|p| p.chapters);
        same_format && same_type
    }
}

fn share(part: usize, total: usize) -> f64 {
    part as f64 * 100.0 / total as f64
}
