use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::env::SearchEnv;
use super::platform::create_private_dir;
use crate::core::types::{DataModel, Location};

/// Produces the directories of one location.
///
/// `create` asks the strategy to make its directories when it owns them
/// (only the filesystem home does).
pub type DirectoryStrategy = fn(&SearchEnv, DataModel, bool) -> Option<Vec<PathBuf>>;

/// Directory strategy of a location; `None` for locations the manager
/// resolves itself (cache record, download).
#[must_use]
pub fn directory_strategy(location: Location) -> Option<DirectoryStrategy> {
    match location {
        Location::FilesystemHome => Some(filesystem_home_dirs),
        Location::LibrarySearchPath => Some(library_path_dirs),
        Location::InstallDir => Some(install_dirs),
        Location::Classpath => Some(classpath_dirs),
        Location::Cwd => Some(cwd_dirs),
        Location::Temp => Some(temp_dirs),
        Location::Cache | Location::Download => None,
    }
}

/// Directories of `location`, empty when it has none.
#[must_use]
pub fn directories(
    location: Location,
    env: &SearchEnv,
    model: DataModel,
    create: bool,
) -> Vec<PathBuf> {
    directory_strategy(location)
        .and_then(|strategy| strategy(env, model, create))
        .unwrap_or_default()
}

fn split_path_list(list: &str, separator: char) -> Vec<PathBuf> {
    list.split(separator)
        .filter(|element| !element.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn filesystem_home_dirs(env: &SearchEnv, model: DataModel, create: bool) -> Option<Vec<PathBuf>> {
    let home = env.ncbi_home()?;
    if create && !create_private_dir(&home, true) {
        return None;
    }

    let lib = home.join(format!("lib{}", model.bits()));
    if create && !create_private_dir(&lib, false) {
        return None;
    }
    Some(vec![lib])
}

fn library_path_dirs(env: &SearchEnv, _: DataModel, _: bool) -> Option<Vec<PathBuf>> {
    let list = env.library_path.as_deref()?;
    trace!("library path = {}", list);
    Some(split_path_list(list, env.path_separator))
}

fn classpath_dirs(env: &SearchEnv, _: DataModel, _: bool) -> Option<Vec<PathBuf>> {
    let list = env.classpath.as_deref()?;
    trace!("classpath = {}", list);

    let dirs = split_path_list(list, env.path_separator)
        .into_iter()
        .filter_map(|element| {
            if !element.is_file() {
                return Some(element);
            }
            // a file entry stands for the directory holding it
            match element.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
                _ => env.current_dir.clone(),
            }
        })
        .collect();
    Some(dirs)
}

fn install_dirs(env: &SearchEnv, _: DataModel, _: bool) -> Option<Vec<PathBuf>> {
    let dir = find_install_dir(env);
    match &dir {
        Some(d) => trace!("install directory is {}", d.display()),
        None => trace!("{} was not found", env.install_artifact),
    }
    dir.map(|d| vec![d])
}

/// Directory of the classpath entry naming the installed binding artifact.
#[must_use]
pub fn find_install_dir(env: &SearchEnv) -> Option<PathBuf> {
    let list = env.classpath.as_deref()?;

    for element in split_path_list(list, env.path_separator) {
        let is_artifact = element
            .file_name()
            .is_some_and(|name| name.to_string_lossy() == env.install_artifact);
        if !is_artifact {
            continue;
        }
        if !element.exists() {
            debug!("{} from classpath does not exist", element.display());
            continue;
        }

        match element.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => return Some(parent.to_path_buf()),
            _ => {
                if let Some(cwd) = &env.current_dir {
                    return Some(cwd.clone());
                }
                debug!("Cannot get directory for {}", env.install_artifact);
            }
        }
    }
    None
}

fn cwd_dirs(env: &SearchEnv, _: DataModel, _: bool) -> Option<Vec<PathBuf>> {
    env.current_dir.clone().map(|d| vec![d])
}

fn temp_dirs(env: &SearchEnv, _: DataModel, _: bool) -> Option<Vec<PathBuf>> {
    if let Some(dir) = &env.temp_dir {
        debug!("Use {} as temporary directory", dir.display());
        return Some(vec![dir.clone()]);
    }
    trace!("Temporary directory was not found in environment");

    let existing: Vec<PathBuf> = env
        .fallback_temp_dirs
        .iter()
        .filter(|d| d.exists())
        .cloned()
        .collect();
    if existing.is_empty() {
        debug!("Could not find any temporary directory");
        None
    } else {
        Some(existing)
    }
}

/// Iterator over candidate library paths: every directory of every requested
/// location, joined with every candidate file name.
///
/// Yields `None` once all locations are exhausted; [`CandidatePaths::reset`]
/// starts a fresh pass.
pub struct CandidatePaths<'a> {
    env: &'a SearchEnv,
    model: DataModel,
    create_dirs: bool,
    file_names: Vec<String>,
    pending: VecDeque<Location>,
    current: Option<Location>,
    dirs: Vec<PathBuf>,
    dir_index: usize,
    name_index: usize,
}

impl<'a> CandidatePaths<'a> {
    pub fn new(
        env: &'a SearchEnv,
        model: DataModel,
        locations: &[Location],
        file_names: Vec<String>,
    ) -> Self {
        trace!("Creating candidate paths({:?}, {:?})", file_names, locations);
        Self {
            env,
            model,
            create_dirs: false,
            file_names,
            pending: locations.iter().copied().collect(),
            current: None,
            dirs: Vec::new(),
            dir_index: 0,
            name_index: 0,
        }
    }

    /// Iterate a single location.
    pub fn single(
        env: &'a SearchEnv,
        model: DataModel,
        location: Location,
        file_names: Vec<String>,
    ) -> Self {
        Self::new(env, model, &[location], file_names)
    }

    /// Create owned directories (the filesystem home) while iterating.
    #[must_use]
    pub fn creating_dirs(mut self) -> Self {
        self.create_dirs = true;
        self
    }

    /// Start over with a new set of locations.
    pub fn reset(&mut self, locations: &[Location]) {
        self.pending = locations.iter().copied().collect();
        self.current = None;
        self.dirs.clear();
        self.dir_index = 0;
        self.name_index = 0;
    }

    /// Location of the most recently yielded path
    #[must_use]
    pub fn current_location(&self) -> Option<Location> {
        self.current
    }

    fn advance_location(&mut self) -> bool {
        while let Some(location) = self.pending.pop_front() {
            trace!("Candidate paths: next location {}", location);
            self.current = Some(location);
            self.dirs = directories(location, self.env, self.model, self.create_dirs);
            self.dir_index = 0;
            self.name_index = 0;
            if !self.dirs.is_empty() {
                return true;
            }
        }
        false
    }
}

impl Iterator for CandidatePaths<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        if self.file_names.is_empty() {
            return None;
        }
        loop {
            if let Some(dir) = self.dirs.get(self.dir_index) {
                let path = Path::new(dir).join(&self.file_names[self.name_index]);
                self.name_index += 1;
                if self.name_index >= self.file_names.len() {
                    self.name_index = 0;
                    self.dir_index += 1;
                }
                return Some(path);
            }
            if !self.advance_location() {
                return None;
            }
        }
    }
}
