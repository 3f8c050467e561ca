//! Code regarding file input (reading source `.vm` files)
//! and output (writing the generated `.asm` file).
//!
//! ## Input
//! `vmt` accepts either a single `.vm` file or a directory. In directory
//! mode every `.vm` file directly inside the directory belongs to the
//! program, and the file defining the program entry point (`Sys.vm`) is
//! always translated first so the bootstrap's jump target exists.
//!
//! A source file whose stem names one of the fixed OS library modules is
//! classified as a library file; the reachability analysis alternates over
//! user and library files separately.
//!
//! ## Output
//! A single `.asm` file, named by substituting the input path's extension
//! (`Foo.vm` -> `Foo.asm`, `project` -> `project.asm`).

pub mod input {
    use std::{
        fs, io,
        path::{Path, PathBuf},
    };

    use phf::phf_set;

    /// Stems of the fixed OS library file set shipped alongside compiled
    /// user code.
    static OS_MODULES: phf::Set<&'static str> = phf_set! {
        "Array",
        "Keyboard",
        "Math",
        "Memory",
        "Output",
        "Screen",
        "String",
        "Sys",
    };

    /// Stem of the file defining the program entry point.
    const ENTRY_FILE_STEM: &str = "Sys";

    /// A loaded VM source file. The file stem doubles as the
    /// per-file namespace of the `static` segment.
    #[derive(Debug)]
    pub struct SourceFile {
        name: String,
        content: String,
    }

    impl SourceFile {
        pub fn load(path: &Path) -> io::Result<Self> {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .ok_or_else(|| io::Error::other("source path has no file name"))?;
            let content = fs::read_to_string(path)?;

            Ok(Self { name, content })
        }

        /// Construct an internally defined source file
        /// (as opposed to a loaded one).
        ///
        /// Most commonly used in tests.
        pub fn internal<S: Into<String>>(name: S, content: S) -> Self {
            Self {
                name: name.into(),
                content: content.into(),
            }
        }

        pub fn name(&self) -> &str {
            &self.name
        }

        pub fn content(&self) -> &str {
            &self.content
        }

        pub fn is_library(&self) -> bool {
            OS_MODULES.contains(&self.name)
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum SourceSetKind {
        SingleFile,
        Directory,
    }

    /// The set of source files making up one translation run,
    /// in translation order.
    #[derive(Debug)]
    pub struct SourceSet {
        pub kind: SourceSetKind,
        pub files: Vec<SourceFile>,
    }

    impl SourceSet {
        pub fn discover(path: &Path) -> io::Result<Self> {
            if path.is_dir() {
                Self::discover_directory(path)
            } else {
                Ok(Self {
                    kind: SourceSetKind::SingleFile,
                    files: vec![SourceFile::load(path)?],
                })
            }
        }

        fn discover_directory(path: &Path) -> io::Result<Self> {
            let mut vm_paths: Vec<PathBuf> = fs::read_dir(path)?
                .collect::<io::Result<Vec<_>>>()?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "vm"))
                .collect();

            // directory iteration order is platform-dependent
            vm_paths.sort();

            let mut files = vm_paths
                .iter()
                .map(|p| SourceFile::load(p))
                .collect::<io::Result<Vec<_>>>()?;

            order_for_translation(&mut files);

            Ok(Self {
                kind: SourceSetKind::Directory,
                files,
            })
        }
    }

    /// Move the entry-point file to the front; the rest keep their order.
    fn order_for_translation(files: &mut [SourceFile]) {
        if let Some(position) = files.iter().position(|f| f.name == ENTRY_FILE_STEM) {
            files[..=position].rotate_right(1);
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_entry_file_ordered_first() {
            let mut files = vec![
                SourceFile::internal("Main", ""),
                SourceFile::internal("Sys", ""),
                SourceFile::internal("Board", ""),
            ];

            order_for_translation(&mut files);

            let names: Vec<_> = files.iter().map(SourceFile::name).collect();
            assert_eq!(names, vec!["Sys", "Main", "Board"]);
        }

        #[test]
        fn test_library_classification() {
            assert!(SourceFile::internal("Math", "").is_library());
            assert!(SourceFile::internal("Sys", "").is_library());
            assert!(!SourceFile::internal("Main", "").is_library());
            assert!(!SourceFile::internal("MathUtils", "").is_library());
        }
    }
}

pub mod output {
    use std::{
        fs,
        io::{self, Write},
        path::{Path, PathBuf},
    };

    /// Output path derived from the input path by extension substitution.
    pub fn derive_path(input: &Path) -> PathBuf {
        input.with_extension("asm")
    }

    pub fn write(path: &Path, content: &str) -> io::Result<()> {
        let mut file = fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        file.write_all(b"\n")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_output_path_derivation() {
            assert_eq!(
                derive_path(Path::new("project/Main.vm")),
                PathBuf::from("project/Main.asm")
            );
            assert_eq!(derive_path(Path::new("project")), PathBuf::from("project.asm"));
        }
    }
}
