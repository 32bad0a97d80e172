use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use indoc::indoc;

const NATCLASS_CMD: &str = env!("CARGO_BIN_EXE_natclass");

const FEATURES: &str = indoc!(
    "
    \tsyll\tcons\tson\tnasal\tlab\tstress
    p\t-\t+\t-\t-\t+\t0
    t\t-\t+\t-\t-\t-\t0
    m\t-\t+\t+\t+\t+\t0
    n\t-\t+\t+\t+\t-\t0
    a\t+\t-\t+\t0\t0\t-
    á\t+\t-\t+\t0\t0\t+
    "
);

const LEXICON: &str = indoc!(
    "
    p a m\tnoun
    t a n
    p a t
    m á
    t á p a
    n a m á t
    p a n a
    m a p
    "
);

const SUBLEXICON: &str = indoc!(
    "
    p a m
    t a n
    m a n á m
    "
);

struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("features.tsv"), FEATURES).unwrap();
        fs::write(dir.path().join("lexicon.txt"), LEXICON).unwrap();
        fs::write(dir.path().join("sublexicon.txt"), SUBLEXICON).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

fn natclass(args: &[&str], paths: &[PathBuf]) -> Output {
    Command::new(NATCLASS_CMD)
        .args(args)
        .args(paths)
        .output()
        .expect("failed to execute natclass")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

mod classes {
    use super::*;

    #[test]
    fn writes_one_class_per_line() {
        let fx = Fixture::new();
        let output = natclass(&["classes"], &[fx.path("features.tsv")]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.lines().any(|line| line == "+nasal\tm,n"));
        assert!(text.lines().all(|line| line.split('\t').count() == 2));
    }

    #[test]
    fn writes_to_a_file() {
        let fx = Fixture::new();
        let out = fx.path("classes.tsv");
        let output = natclass(
            &["classes", "-o", out.to_str().unwrap()],
            &[fx.path("features.tsv")],
        );
        assert!(output.status.success());
        assert!(stdout(&output).is_empty());
        assert!(fs::read_to_string(out).unwrap().contains("+syll\ta,á"));
    }

    #[test]
    fn missing_table_fails() {
        let fx = Fixture::new();
        let output = natclass(&["classes"], &[fx.path("nope.tsv")]);
        assert!(!output.status.success());
        assert!(String::from_utf8_lossy(&output.stderr)
            .contains("Could not read feature table"));
    }
}

mod query {
    use super::*;

    #[test]
    fn tightest_class_of_nasals() {
        let fx = Fixture::new();
        let output = natclass(
            &["query", "--tightest", "m,n"],
            &[fx.path("features.tsv")],
        );
        assert!(output.status.success());
        assert_eq!(stdout(&output), "exact\t+nasal\tm,n\n");
    }

    #[test]
    fn ambiguous_classes_are_marked() {
        let fx = Fixture::new();
        let features = fx.path("identical.tsv");
        fs::write(&features, "\tsyll\tcons\nb\t-\t+\np\t-\t+\na\t+\t-\n")
            .unwrap();
        let output = natclass(&["query", "--segment", "p"], &[features]);
        assert!(output.status.success());

        let text = stdout(&output);
        assert!(text.lines().any(|line| line == "-syll,+cons\tp\tambiguous"));
        assert!(text.lines().any(|line| line == "-syll\tb,p"));
    }

    #[test]
    fn incoherent_query_fails() {
        let fx = Fixture::new();
        let output = natclass(
            &["query", "--tightest", "p,a"],
            &[fx.path("features.tsv")],
        );
        assert!(!output.status.success());
        assert_eq!(stdout(&output), "None\n");
    }
}

mod simulate {
    use super::*;

    #[test]
    fn text_report_is_reproducible() {
        let fx = Fixture::new();
        let run = || {
            natclass(
                &["simulate", "-q", "-n", "200", "--seed", "42"],
                &[
                    fx.path("features.tsv"),
                    fx.path("lexicon.txt"),
                    fx.path("sublexicon.txt"),
                ],
            )
        };
        let first = run();
        let second = run();
        assert!(first.status.success());
        assert_eq!(first.stdout, second.stdout);

        let text = stdout(&first);
        assert!(text.starts_with("n_draws\t200\n"));
        assert!(text.contains("sublexicon_size\t3\n"));
        assert!(text.contains("sublexicon_tolerance\t2.73\n"));
        assert!(text.contains("sublexicon_class\t[+nasal]\tm,n\n"));
    }

    #[test]
    fn json_lengths_only() {
        let fx = Fixture::new();
        let output = natclass(
            &["simulate", "-q", "--lengths-only", "-f", "json", "-n", "50"],
            &[
                fx.path("features.tsv"),
                fx.path("lexicon.txt"),
                fx.path("sublexicon.txt"),
            ],
        );
        assert!(output.status.success());
        let value: serde_json::Value =
            serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(value["n_draws"], 50);
        assert_eq!(value["threshold"], 2);
    }

    #[test]
    fn repeated_words_weight_the_sample() {
        let fx = Fixture::new();
        let repeated = fx.path("repeated.txt");
        fs::write(&repeated, "p a m\np a m\nt a n\n").unwrap();
        let run = |extra: &[&str]| {
            let mut args: Vec<&str> =
                vec!["simulate", "-q", "-n", "20", "--seed", "3"];
            args.extend_from_slice(extra);
            let output = natclass(
                &args,
                &[
                    fx.path("features.tsv"),
                    fx.path("lexicon.txt"),
                    repeated.clone(),
                ],
            );
            assert!(output.status.success());
            stdout(&output)
        };

        let tokens = run(&[]);
        assert!(tokens.contains("sample_size\t3\n"));
        assert!(tokens.contains("sublexicon_size\t3\n"));

        let types = run(&["--types"]);
        assert!(types.contains("sample_size\t2\n"));
        assert!(types.contains("sublexicon_size\t2\n"));
    }
}

mod compare {
    use super::*;

    #[test]
    fn yaml_report() {
        let fx = Fixture::new();
        let output = natclass(
            &["compare", "-q", "-n", "100", "-f", "yaml", "--cap", "2"],
            &[
                fx.path("features.tsv"),
                fx.path("lexicon.txt"),
                fx.path("sublexicon.txt"),
            ],
        );
        assert!(output.status.success());
        let text = stdout(&output);
        assert!(text.contains("n_draws: 100"));
        assert!(text.contains("sample_size: 3"));
    }
}

mod profiles {
    use super::*;

    #[test]
    fn syllable_histogram() {
        let fx = Fixture::new();
        let output = natclass(
            &["prosody", "--profile", "syllables"],
            &[fx.path("features.tsv"), fx.path("lexicon.txt")],
        );
        assert!(output.status.success());
        assert_eq!(stdout(&output), "1\t5\n2\t3\n");
    }

    #[test]
    fn segment_ngram_diff() {
        let fx = Fixture::new();
        let output = natclass(
            &["ngrams", "--diff", "--sublexicon"],
            &[
                fx.path("sublexicon.txt"),
                fx.path("features.tsv"),
                fx.path("lexicon.txt"),
            ],
        );
        assert!(output.status.success());
        let text = stdout(&output);
        assert!(text.lines().any(|line| line == "p a t"));
        assert!(!text.lines().any(|line| line == "p a m"));
    }
}
