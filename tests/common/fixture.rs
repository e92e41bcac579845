//! Test fixture for setting up temporary git repositories

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Repository, RepositoryInitOptions, Signature};
use rejoin::git::{Client, SharedExecutor};
use tempfile::TempDir;

use super::helpers::git_command;

/// Contents of `shared.txt` before either branch touches it
pub const BASE: &str = "alpha\nbeta\ngamma\n";

/// Test fixture that sets up a temporary git repository on `main`
pub struct TestFixture {
    /// Temporary directory holding the repo and any remotes
    temp_dir: TempDir,
    /// Path to the git repository
    pub repo_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        // Canonicalize to handle symlinked temp dirs.
        let base = temp_dir
            .path()
            .canonicalize()
            .unwrap_or_else(|_| temp_dir.path().to_path_buf());
        let repo_path = base.join("repo");
        fs::create_dir_all(&repo_path)?;

        // A stable default branch name regardless of the user's init.defaultBranch
        let mut init_opts = RepositoryInitOptions::new();
        init_opts.initial_head("main");
        let repo = Repository::init_opts(&repo_path, &init_opts)?;

        // rebase and merge create commits through the git CLI, which needs an identity
        let mut config = repo.config()?;
        config.set_str("user.name", "Test")?;
        config.set_str("user.email", "test@test.com")?;
        config.set_bool("commit.gpgsign", false)?;

        let sig = Signature::now("Test", "test@test.com")?;
        fs::write(repo_path.join("shared.txt"), BASE)?;
        let mut index = repo.index()?;
        index.add_path(Path::new("shared.txt"))?;
        index.write()?;
        let tree_id = index.write_tree()?;
        let tree = repo.find_tree(tree_id)?;
        repo.commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])?;

        Ok(Self {
            temp_dir,
            repo_path,
        })
    }

    /// Scratch directory next to the repository
    pub fn scratch(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Run git in the repository, failing on a non-zero exit
    pub fn git(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error>> {
        git_command(&self.repo_path, args)
    }

    /// Whether git exits successfully in the repository
    pub fn git_succeeds(&self, args: &[&str]) -> Result<bool, Box<dyn std::error::Error>> {
        Ok(std::process::Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()?
            .status
            .success())
    }

    pub fn write(&self, name: &str, contents: &str) -> Result<(), Box<dyn std::error::Error>> {
        fs::write(self.repo_path.join(name), contents)?;
        Ok(())
    }

    pub fn read(&self, name: &str) -> Result<String, Box<dyn std::error::Error>> {
        Ok(fs::read_to_string(self.repo_path.join(name))?)
    }

    /// Write a file and commit it on the current branch
    pub fn commit_file(
        &self,
        name: &str,
        contents: &str,
        message: &str,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.write(name, contents)?;
        self.git(&["add", "--", name])?;
        self.git(&["commit", "-q", "-m", message])?;
        Ok(())
    }

    pub fn rev(&self, name: &str) -> Result<String, Box<dyn std::error::Error>> {
        self.git(&["rev-parse", name])
    }

    pub fn client(&self) -> Result<Client<SharedExecutor>, Box<dyn std::error::Error>> {
        Ok(rejoin::git::client_for(&self.repo_path)?)
    }

    /// `feature` adds a file; `main` moves on independently. Leaves `feature` checked out.
    pub fn diverge_cleanly(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.git(&["checkout", "-q", "-b", "feature"])?;
        self.commit_file("feature.txt", "new feature\n", "Add feature")?;
        self.git(&["checkout", "-q", "main"])?;
        self.commit_file("main.txt", "main work\n", "Main work")?;
        self.git(&["checkout", "-q", "feature"])?;
        Ok(())
    }

    /// Both branches rewrite the same line of `shared.txt`. Leaves `feature` checked out.
    pub fn diverge_with_conflict(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.git(&["checkout", "-q", "-b", "feature"])?;
        self.commit_file("shared.txt", "alpha\nfeature beta\ngamma\n", "Feature beta")?;
        self.git(&["checkout", "-q", "main"])?;
        self.commit_file("shared.txt", "alpha\nmain beta\ngamma\n", "Main beta")?;
        self.git(&["checkout", "-q", "feature"])?;
        Ok(())
    }
}
