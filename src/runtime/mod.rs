//! Runtime abstraction for system operations.
//!
//! Every side effect of the installer (file system, environment, terminal
//! prompts, desktop integration) goes through the [`Runtime`] trait so the
//! flows can be exercised with `MockRuntime` in tests.
//!
//! # Structure
//!
//! - `env` - Environment variables, well-known directories, `PATH` lookup
//! - `fs` - File system operations (read, write, directory)
//! - `user` - User interaction (line prompts, confirmation, fuzzy picker)
//! - `desktop` - Opening URIs and web pages
//! - `process` - Running external programs

mod desktop;
mod env;
mod fs;
mod process;
mod user;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

pub use env::find_in_path;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> Result<u64>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    fn remove_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
    fn file_size(&self, path: &Path) -> Result<u64>;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;

    // Directories
    fn home_dir(&self) -> Option<PathBuf>;
    fn temp_dir(&self) -> PathBuf;

    // User interaction
    /// Whether both stdin and stdout are attached to a terminal.
    fn is_interactive(&self) -> bool;

    /// Print `prompt` and read one line. Returns `None` at end of input.
    fn prompt(&self, prompt: &str) -> Result<Option<String>>;

    /// Prompt user for confirmation. Returns true if user confirms (y/yes), false otherwise.
    fn confirm(&self, prompt: &str) -> Result<bool>;

    /// Show a filter-as-you-type list. Returns the chosen index, or `None` if cancelled.
    fn fuzzy_select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>>;

    // Desktop integration
    /// Hand a URI (custom scheme included) to the platform opener.
    fn open_uri(&self, uri: &str) -> Result<()>;

    /// Open a web page in the user's browser.
    fn open_browser(&self, url: &str) -> Result<()>;

    // Processes
    /// Run `program` to completion. A non-zero exit status is an error.
    fn run_command(&self, program: &Path, args: &[String]) -> Result<()>;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.read_to_string_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.rename_impl(from, to)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<u64> {
        self.copy_impl(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.remove_file_impl(path)
    }

    fn remove_dir_all(&self, path: &Path) -> Result<()> {
        self.remove_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.is_dir_impl(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.read_dir_impl(path)
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        self.file_size_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir_impl()
    }

    fn temp_dir(&self) -> PathBuf {
        self.temp_dir_impl()
    }

    fn is_interactive(&self) -> bool {
        self.is_interactive_impl()
    }

    fn prompt(&self, prompt: &str) -> Result<Option<String>> {
        self.prompt_impl(prompt)
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        self.confirm_impl(prompt)
    }

    fn fuzzy_select(&self, prompt: &str, items: &[String]) -> Result<Option<usize>> {
        self.fuzzy_select_impl(prompt, items)
    }

    fn open_uri(&self, uri: &str) -> Result<()> {
        self.open_uri_impl(uri)
    }

    fn open_browser(&self, url: &str) -> Result<()> {
        self.open_browser_impl(url)
    }

    fn run_command(&self, program: &Path, args: &[String]) -> Result<()> {
        self.run_command_impl(program, args)
    }
}
