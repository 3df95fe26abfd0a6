use std::fmt;

/// Branch names that select the ACT repository instead of GROMACS.
const ACT_BRANCHES: [&str; 2] = ["main", "david"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildTarget {
    Act,
    Gromacs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneScheme {
    Ssh,
    Https,
}

impl CloneScheme {
    /// SSH when a non-blank account name was given, HTTPS otherwise.
    pub fn for_user(user: Option<&str>) -> Self {
        match user {
            Some(u) if !u.trim().is_empty() => CloneScheme::Ssh,
            _ => CloneScheme::Https,
        }
    }
}

impl BuildTarget {
    pub fn from_branch(branch: &str) -> Self {
        if ACT_BRANCHES.contains(&branch) {
            BuildTarget::Act
        } else {
            BuildTarget::Gromacs
        }
    }

    pub fn default_branch(&self) -> &'static str {
        match self {
            BuildTarget::Act => "main",
            BuildTarget::Gromacs => "master",
        }
    }

    /// Name of the directory `git clone` produces for this target.
    pub fn directory_name(&self) -> &'static str {
        match self {
            BuildTarget::Act => "ACT",
            BuildTarget::Gromacs => "gromacs",
        }
    }

    pub fn repository_url(&self, scheme: CloneScheme) -> &'static str {
        match (self, scheme) {
            (BuildTarget::Act, CloneScheme::Ssh) => "git@github.com:dspoel/ACT.git",
            (BuildTarget::Act, CloneScheme::Https) => "https://github.com/dspoel/ACT.git",
            (BuildTarget::Gromacs, CloneScheme::Ssh) => "git@gitlab.com:gromacs/gromacs.git",
            (BuildTarget::Gromacs, CloneScheme::Https) => "https://gitlab.com/gromacs/gromacs.git",
        }
    }

    /// GROMACS checkouts live under a directory named after the branch so several
    /// branches can coexist; ACT is cloned directly into the working directory.
    pub fn uses_branch_root(&self) -> bool {
        matches!(self, BuildTarget::Gromacs)
    }

    pub fn needs_checkout(&self, branch: &str) -> bool {
        branch != self.default_branch()
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.directory_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    Single,
    #[default]
    Double,
}

impl Precision {
    pub fn from_single_flag(single: bool) -> Self {
        if single {
            Precision::Single
        } else {
            Precision::Double
        }
    }

    pub fn is_double(&self) -> bool {
        matches!(self, Precision::Double)
    }

    /// `build_<type>` for single precision, `build_<type>_DOUBLE` for double.
    pub fn build_dir_name(&self, build_type: &str) -> String {
        match self {
            Precision::Single => format!("build_{}", build_type),
            Precision::Double => format!("build_{}_DOUBLE", build_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn act_branches_select_act_with_main_as_default() {
        for branch in ["main", "david"] {
            let target = BuildTarget::from_branch(branch);
            assert_eq!(target, BuildTarget::Act);
            assert_eq!(target.default_branch(), "main");
            assert!(!target.uses_branch_root());
        }
    }

    #[test]
    fn other_branches_select_gromacs_with_master_as_default() {
        for branch in ["master", "release-2023", "Main", "", "david2"] {
            let target = BuildTarget::from_branch(branch);
            assert_eq!(target, BuildTarget::Gromacs);
            assert_eq!(target.default_branch(), "master");
            assert!(target.uses_branch_root());
        }
    }

    #[test]
    fn checkout_is_needed_only_off_the_default_branch() {
        assert!(!BuildTarget::Act.needs_checkout("main"));
        assert!(BuildTarget::Act.needs_checkout("david"));
        assert!(!BuildTarget::Gromacs.needs_checkout("master"));
        assert!(BuildTarget::Gromacs.needs_checkout("release-2024"));
    }

    #[test]
    fn clone_scheme_follows_presence_of_user() {
        assert_eq!(CloneScheme::for_user(Some("alice")), CloneScheme::Ssh);
        assert_eq!(CloneScheme::for_user(None), CloneScheme::Https);
        assert_eq!(CloneScheme::for_user(Some("")), CloneScheme::Https);
        assert_eq!(CloneScheme::for_user(Some("  ")), CloneScheme::Https);
        assert_eq!(
            BuildTarget::Act.repository_url(CloneScheme::Ssh),
            "git@github.com:dspoel/ACT.git"
        );
        assert_eq!(
            BuildTarget::Gromacs.repository_url(CloneScheme::Https),
            "https://gitlab.com/gromacs/gromacs.git"
        );
    }

    #[test]
    fn build_dir_name_depends_on_precision() {
        assert_eq!(Precision::Single.build_dir_name("Release"), "build_Release");
        assert_eq!(
            Precision::Double.build_dir_name("Release"),
            "build_Release_DOUBLE"
        );
        assert_eq!(
            Precision::Double.build_dir_name("Rel_With_Deb"),
            "build_Rel_With_Deb_DOUBLE"
        );
        assert_eq!(Precision::Single.build_dir_name("ASAN_x"), "build_ASAN_x");
    }

    #[test]
    fn precision_defaults_to_double() {
        assert_eq!(Precision::default(), Precision::Double);
        assert_eq!(Precision::from_single_flag(false), Precision::Double);
        assert_eq!(Precision::from_single_flag(true), Precision::Single);
    }
}
