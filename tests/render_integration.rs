//! Integration tests for rendering a working tree.

use std::fs;
use std::path::{Path, PathBuf};

use gh_template::core::config::{resolve, ConfigResolver, RunConfiguration};
use gh_template::core::params::ParameterStore;
use gh_template::render::{RenderError, Renderer, TemplateRenderer};

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

fn params() -> ParameterStore {
    let mut params = ParameterStore::new();
    params.merge([
        ("github.owner", "octo"),
        ("github.repo", "app"),
        ("project", "Demo"),
    ]);
    params
}

fn render(root: &Path, config: &RunConfiguration) -> Vec<PathBuf> {
    TemplateRenderer::new()
        .apply(root, &params(), config)
        .unwrap()
        .rendered
}

mod exclusions {
    use super::*;

    #[test]
    fn default_delimiters_protect_workflows() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), ".github/workflows/ci.yml", "if: ${{ github.event_name == 'push' }}\n");
        write(dir.path(), ".github/CODEOWNERS", "* @{{ github.owner }}\n");

        let config = resolve::<&str>(None, None, &[], None).unwrap();
        let rendered = render(dir.path(), &config);

        assert_eq!(rendered, vec![PathBuf::from(".github/CODEOWNERS")]);
        assert_eq!(read(dir.path(), ".github/CODEOWNERS"), "* @octo\n");
        assert_eq!(
            read(dir.path(), ".github/workflows/ci.yml"),
            "if: ${{ github.event_name == 'push' }}\n"
        );
    }

    #[test]
    fn exclusions_are_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Docs/guide.md", "{{ undefined_value }}");
        write(dir.path(), "docs-extra/notes.md", "{{ project }}");

        let config = ConfigResolver::new().exclude(["DOCS/"]).resolve().unwrap();
        let rendered = render(dir.path(), &config);

        assert_eq!(rendered, vec![PathBuf::from("docs-extra/notes.md")]);
        assert_eq!(read(dir.path(), "Docs/guide.md"), "{{ undefined_value }}");
    }

    #[test]
    fn excluded_file_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "LICENSE", "Copyright {{ year }} {{ unknown }}");

        let config = ConfigResolver::new().exclude(["license"]).resolve().unwrap();
        assert!(render(dir.path(), &config).is_empty());
    }
}

mod delimiters {
    use super::*;

    #[test]
    fn custom_delimiters_render_workflows() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            ".github/workflows/ci.yml",
            "name: <% project %>\nif: ${{ github.event_name }}\n",
        );
        write(dir.path(), "README.md", "# {{ not touched }}\n");

        let config = resolve(Some("<%"), Some("%>"), &[] as &[&str], None).unwrap();
        let rendered = render(dir.path(), &config);

        assert_eq!(rendered, vec![PathBuf::from(".github/workflows/ci.yml")]);
        assert_eq!(
            read(dir.path(), ".github/workflows/ci.yml"),
            "name: Demo\nif: ${{ github.event_name }}\n"
        );
        assert_eq!(read(dir.path(), "README.md"), "# {{ not touched }}\n");
    }

    #[test]
    fn shell_length_expansion_with_custom_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "run.sh", "echo << project >> ${#ARGS[@]}\n");

        let config = resolve(Some("<<"), Some(">>"), &[] as &[&str], None).unwrap();
        let rendered = render(dir.path(), &config);

        assert_eq!(rendered, vec![PathBuf::from("run.sh")]);
        assert_eq!(read(dir.path(), "run.sh"), "echo Demo ${#ARGS[@]}\n");
    }

    #[test]
    fn bare_statement_braces_with_default_delimiters() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "run.sh", "# {{ project }}\nprintf '%s' \"{%\"\n");

        let config = resolve::<&str>(None, None, &[], None).unwrap();
        render(dir.path(), &config);

        assert_eq!(read(dir.path(), "run.sh"), "# Demo\nprintf '%s' \"{%\"\n");
    }

    #[test]
    fn nested_parameters_and_functions() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "src/lib.rs",
            "// {{ uppercase(github.repo) }} {{ pluralize(2, 'crate') }}\n",
        );

        let config = resolve::<&str>(None, None, &[], None).unwrap();
        render(dir.path(), &config);

        assert_eq!(read(dir.path(), "src/lib.rs"), "// APP crates\n");
    }
}

mod files {
    use super::*;

    #[test]
    fn binary_and_non_utf8_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G', 0, b'{', b'{']).unwrap();
        fs::write(dir.path().join("latin1.txt"), [b'{', b'{', 0xE9, b'}', b'}']).unwrap();

        let config = resolve::<&str>(None, None, &[], None).unwrap();
        let report = TemplateRenderer::new()
            .apply(dir.path(), &params(), &config)
            .unwrap();

        assert_eq!(report.skipped_binary, 2);
        assert!(report.rendered.is_empty());
    }

    #[test]
    fn undefined_parameter_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "templates/config.yml", "owner: {{ github.user }}\n");

        let config = resolve::<&str>(None, None, &[], None).unwrap();
        let err = TemplateRenderer::new()
            .apply(dir.path(), &params(), &config)
            .unwrap_err();

        assert!(matches!(err, RenderError::Template { .. }));
        assert!(err.to_string().contains("templates/config.yml"));
        assert_eq!(read(dir.path(), "templates/config.yml"), "owner: {{ github.user }}\n");
    }
}
