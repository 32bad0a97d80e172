use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use natclass::ngrams::{class_ngrams, joint_table, ngram_diff, segment_ngrams};
use natclass::prosody::grid_ngrams;
use natclass::simulation::{
    GridComparison, MonteCarloSimulator, ProgressBar, SyllableCountSim,
};
use natclass::utils::keys_by_count_desc;
use natclass::{
    ambiguity_marker, emit, ClassRef, ClassTable, FeatureTable, KeyValueReport,
    Lexicon, OutputFormat, Prosody, WordListConfig,
};
use serde::Serialize;

use crate::opt;

fn load_table(path: &Path) -> Result<FeatureTable, i32> {
    FeatureTable::from_path(path).map_err(|err| {
        eprintln!("Could not read feature table: {err}");
        1
    })
}

/// Read a word list, keeping repeated words only if `tokens` is set
fn load_lexicon(
    path: &Path,
    config: &WordListConfig,
    tokens: bool,
) -> Result<Lexicon, i32> {
    Lexicon::from_path(path, config)
        .map(|lexicon| if tokens { lexicon } else { lexicon.types() })
        .map_err(|err| {
            eprintln!("Could not read word list {path:?}: {err}");
            1
        })
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn write_counts<W: Write>(
    writer: &mut W,
    counts: &BTreeMap<String, usize>,
) -> io::Result<()> {
    for key in keys_by_count_desc(counts) {
        writeln!(writer, "{key}\t{}", counts[&key])?;
    }
    Ok(())
}

/// Write lexicon and sublexicon n-gram counts side by side, or only the
/// n-grams that differ
fn write_comparison<W: Write>(
    writer: &mut W,
    lex: &BTreeMap<String, usize>,
    sublex: &BTreeMap<String, usize>,
    diff_only: bool,
) -> io::Result<()> {
    if diff_only {
        for gram in ngram_diff(lex, sublex) {
            writeln!(writer, "{gram}")?;
        }
    } else {
        writeln!(writer, "NGRAM\tLEX\tSUBLEX")?;
        for (gram, counts) in joint_table(lex, sublex) {
            writeln!(writer, "{gram}\t{}\t{}", counts.lex, counts.sublex)?;
        }
    }
    Ok(())
}

/// `features<TAB>segments`, flagged like the class table output
fn class_row(class: &ClassRef) -> String {
    format!(
        "{}\t{}{}",
        class.description_string(),
        class.key(),
        ambiguity_marker(class.is_reliable())
    )
}

fn report_io(res: io::Result<()>) -> i32 {
    match res {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Could not write output: {err}");
            1
        }
    }
}

pub fn classes(cmd: opt::ClassesArgs) -> i32 {
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };

    if cmd.check {
        if table.is_well_formed() {
            println!("Every segment can be described uniquely");
            return 0;
        }
        for amb in table.ambiguities() {
            println!("{:?}\t{}\t{}", amb.kind, amb.segment, amb.other);
        }
        return 0;
    }

    let classes = ClassTable::from_feature_table(&table);

    let mut writer: Box<dyn Write> = match cmd.output {
        Some(ref path) => match File::create(path) {
            Ok(file) => Box::new(BufWriter::new(file)),
            Err(err) => {
                eprintln!("Could not create {path:?}: {err}");
                return 1;
            }
        },
        None => Box::new(io::stdout().lock()),
    };

    let res = if cmd.by_segment {
        classes
            .segment_class_map()
            .iter()
            .try_for_each(|(seg, seg_classes)| {
                seg_classes.iter().try_for_each(|class| {
                    writeln!(
                        writer,
                        "{seg}\t{}{}",
                        class.description_string(),
                        ambiguity_marker(class.is_reliable())
                    )
                })
            })
    } else {
        classes.write_to(&mut writer)
    };

    report_io(res.and_then(|_| writer.flush()))
}

pub fn query(cmd: opt::QueryArgs) -> i32 {
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let classes = ClassTable::from_feature_table(&table);
    let inventory = table.inventory();

    if let Some(ref segs) = cmd.tightest {
        match classes.tightest_class_by_names(&split_list(segs)) {
            Ok(tightest) => {
                let kind =
                    if tightest.is_exact() { "exact" } else { "tightest" };
                for class in tightest.classes() {
                    println!("{kind}\t{}", class_row(&class));
                }
                0
            }
            Err(err) => {
                eprintln!("{err}");
                println!("None");
                1
            }
        }
    } else if let Some(ref segs) = cmd.missing {
        let set = match inventory.segment_set(&split_list(segs)) {
            Ok(set) => set,
            Err(err) => {
                eprintln!("{err}");
                return 1;
            }
        };
        let missing = if cmd.maximal {
            classes.maximal_missing_classes(&set)
        } else {
            classes.missing_classes(&set)
        };
        missing
            .iter()
            .for_each(|class| println!("{}", class_row(class)));
        0
    } else if let Some(ref seg) = cmd.segment {
        match classes.classes_of_segment(seg) {
            Ok(seg_classes) => {
                seg_classes
                    .iter()
                    .for_each(|class| println!("{}", class_row(class)));
                0
            }
            Err(err) => {
                eprintln!("{err}");
                1
            }
        }
    } else if let Some(ref feats) = cmd.features_of {
        match table.invert().feats_to_segs(&split_list(feats)) {
            Ok(segs) => {
                println!("{}", inventory.key(&segs));
                0
            }
            Err(err) => {
                eprintln!("{err}");
                1
            }
        }
    } else {
        eprintln!(
            "Nothing to query. \
             Try --tightest, --missing, --segment, or --features-of"
        );
        1
    }
}

pub fn prosody(cmd: opt::ProsodyArgs) -> i32 {
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let index = table.invert();
    let prosody = match Prosody::new(&index) {
        Ok(prosody) => prosody,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let config = cmd.word_list.config();
    let lexicon = match load_lexicon(&cmd.words, &config, false) {
        Ok(lexicon) => lexicon,
        Err(code) => return code,
    };

    let profile_of = |lexicon: &Lexicon| match cmd.profile {
        opt::Profile::Syllables => Ok(prosody
            .syllable_counts(lexicon)
            .into_iter()
            .map(|(n, count)| (n.to_string(), count))
            .collect::<BTreeMap<String, usize>>()),
        opt::Profile::Cv => prosody.cv_skeleta(lexicon),
        opt::Profile::Grids => prosody.x_grids(lexicon, cmd.ignore_stress),
    };

    let lex_profile = match profile_of(&lexicon) {
        Ok(profile) => profile,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let mut stdout = io::stdout().lock();
    let res = match cmd.sublexicon {
        None => write_counts(&mut stdout, &lex_profile),
        Some(ref path) => {
            let sublexicon = match load_lexicon(path, &config, false) {
                Ok(lexicon) => lexicon,
                Err(code) => return code,
            };
            let sublex_profile = match profile_of(&sublexicon) {
                Ok(profile) => profile,
                Err(err) => {
                    eprintln!("{err}");
                    return 1;
                }
            };
            write_comparison(
                &mut stdout,
                &grid_ngrams(&lex_profile),
                &grid_ngrams(&sublex_profile),
                cmd.diff,
            )
        }
    };
    report_io(res)
}

pub fn ngrams(cmd: opt::NgramsArgs) -> i32 {
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let classes = ClassTable::from_feature_table(&table);
    let config = cmd.word_list.config();

    let count = |path: &Path| -> Result<BTreeMap<String, usize>, i32> {
        let lexicon = load_lexicon(path, &config, false)?;
        let segs = segment_ngrams(&lexicon);
        if cmd.classes {
            class_ngrams(&segs, &classes).map_err(|err| {
                eprintln!("{err}");
                1
            })
        } else {
            Ok(segs)
        }
    };

    let lex = match count(&cmd.words) {
        Ok(counts) => counts,
        Err(code) => return code,
    };

    let mut stdout = io::stdout().lock();
    let res = match cmd.sublexicon {
        None => write_counts(&mut stdout, &lex),
        Some(ref path) => match count(path) {
            Ok(sublex) => {
                write_comparison(&mut stdout, &lex, &sublex, cmd.diff)
            }
            Err(code) => return code,
        },
    };
    report_io(res)
}

fn emit_report<T>(report: &T, format: OutputFormat) -> i32
where
    T: KeyValueReport + Serialize,
{
    let mut stdout = io::stdout().lock();
    match emit(report, format, &mut stdout) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("Could not write report: {err}");
            1
        }
    }
}

fn handler(quiet: bool) -> Option<ProgressBar> {
    if quiet {
        None
    } else {
        Some(ProgressBar::new())
    }
}

pub fn simulate(cmd: opt::SimulateArgs) -> i32 {
    let sim_config = match cmd.simulation_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not load config: {err}");
            return 1;
        }
    };
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let config = cmd.word_list.config();
    let (lexicon, sublexicon) = match (
        load_lexicon(&cmd.lexicon, &config, !cmd.types),
        load_lexicon(&cmd.sublexicon, &config, !cmd.types),
    ) {
        (Ok(lex), Ok(sublex)) => (lex, sublex),
        (Err(code), _) | (_, Err(code)) => return code,
    };
    let index = table.invert();

    if cmd.lengths_only {
        let vowels = match index.vowels() {
            Ok(vowels) => vowels,
            Err(err) => {
                eprintln!("{err}");
                return 1;
            }
        };
        let inventory = table.inventory();
        let res = SyllableCountSim::new(
            lexicon.syllable_counts(vowels, inventory),
            &sublexicon.syllable_counts(vowels, inventory),
            sim_config,
        )
        .and_then(|mut sim| match handler(cmd.quiet) {
            Some(bar) => sim.run_with_handler(bar),
            None => sim.run(),
        });
        return match res {
            Ok(result) => emit_report(&result, cmd.output_format),
            Err(err) => {
                eprintln!("Simulation failed: {err}");
                1
            }
        };
    }

    let classes = ClassTable::from_feature_table(&table);
    let res = MonteCarloSimulator::new(
        &index,
        &classes,
        &lexicon,
        &sublexicon,
        sim_config,
    )
    .and_then(|mut sim| match handler(cmd.quiet) {
        Some(bar) => sim.run_with_handler(bar),
        None => sim.run(),
    });

    match res {
        Ok(result) => emit_report(&result, cmd.output_format),
        Err(err) => {
            eprintln!("Simulation failed: {err}");
            1
        }
    }
}

pub fn compare(cmd: opt::CompareArgs) -> i32 {
    let grid_config = match cmd.comparison_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Could not load config: {err}");
            return 1;
        }
    };
    let table = match load_table(&cmd.features) {
        Ok(table) => table,
        Err(code) => return code,
    };
    let index = table.invert();
    let prosody = match Prosody::new(&index) {
        Ok(prosody) => prosody,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let config = cmd.word_list.config();
    let (lexicon, sublexicon) = match (
        load_lexicon(&cmd.lexicon, &config, false),
        load_lexicon(&cmd.sublexicon, &config, false),
    ) {
        (Ok(lex), Ok(sublex)) => (lex, sublex),
        (Err(code), _) | (_, Err(code)) => return code,
    };

    let grids = prosody
        .x_grids(&lexicon, grid_config.ignore_stress)
        .and_then(|lex| {
            prosody
                .x_grids(&sublexicon, grid_config.ignore_stress)
                .map(|sublex| (lex, sublex))
        });
    let (lex_grids, sublex_grids) = match grids {
        Ok(grids) => grids,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };

    let res = GridComparison::new(&lex_grids, &sublex_grids, grid_config)
        .and_then(|mut sim| match handler(cmd.quiet) {
            Some(bar) => sim.run_with_handler(bar),
            None => sim.run(),
        });

    match res {
        Ok(result) => emit_report(&result, cmd.output_format),
        Err(err) => {
            eprintln!("Comparison failed: {err}");
            1
        }
    }
}
