use approx::assert_relative_eq;
use indoc::indoc;
use natclass::simulation::{
    GridComparison, MonteCarloSimulator, SimulationResult, SyllableCountSim,
};
use natclass::{
    emit, ClassTable, FeatureTable, GridComparisonConfig, Lexicon,
    OutputFormat, Prosody, SimulationConfig,
};

const TABLE: &str = indoc!(
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

const LEXICON: [&str; 10] = [
    "p a m",
    "t a n",
    "p a t",
    "m á",
    "t á p a",
    "n a m á t",
    "p a n a",
    "t a t á m",
    "m a p",
    "a n",
];

const SUBLEXICON: [&str; 3] = ["p a m", "t a n", "m a n á m"];

fn simulate(n_draws: usize, seed: u64) -> SimulationResult {
    let table = FeatureTable::from_tsv(TABLE).unwrap();
    let index = table.invert();
    let classes = ClassTable::from_feature_table(&table);
    let lexicon = Lexicon::from_transcriptions(LEXICON);
    let sublexicon = Lexicon::from_transcriptions(SUBLEXICON);

    let config = SimulationConfig::new().n_draws(n_draws).seed(seed);
    MonteCarloSimulator::new(&index, &classes, &lexicon, &sublexicon, config)
        .unwrap()
        .run()
        .unwrap()
}

fn report(result: &SimulationResult, format: OutputFormat) -> String {
    let mut buf = Vec::new();
    emit(result, format, &mut buf).unwrap();
    String::from_utf8(buf).unwrap()
}

#[test]
fn same_seed_gives_identical_reports() {
    let first = simulate(1000, 42);
    let second = simulate(1000, 42);
    assert_eq!(
        report(&first, OutputFormat::Json),
        report(&second, OutputFormat::Json)
    );
    assert_eq!(
        report(&first, OutputFormat::Text),
        report(&second, OutputFormat::Text)
    );
}

#[test]
fn tallies_cover_every_draw() {
    let result = simulate(500, 7);

    assert_eq!(result.final_classes.values().sum::<usize>(), 500);
    assert_eq!(result.max_lengths.values().sum::<usize>(), 500);
    assert!(result.joint.unwrap() <= 500);
    assert!(result.n_over_threshold <= 500);
    assert!(result.max_syllables.mean >= result.min_syllables.mean);

    let sublex_class = result.sublexicon_class.as_ref().unwrap();
    assert_eq!(sublex_class.description, vec!["+nasal"]);
    assert_eq!(result.sublexicon_max_syllables, 2);
    assert_eq!(result.threshold, 2);

    // stops never end a sublexicon word
    let stops = result
        .absent_classes
        .iter()
        .find(|class| class.segments == "p,t")
        .unwrap();
    assert!(stops.maximal);
    assert!(stops.n_absent <= 500);
    assert_relative_eq!(stops.ratio, stops.n_absent as f64 / 500.0);
}

#[test]
fn max_syllable_mean_converges() {
    // Three draws from {1, 2}: the maximum is 1 with probability 1/8
    let n_draws = 10_000;
    let config = SimulationConfig::new()
        .n_draws(n_draws)
        .seed(1337)
        .sample_size(Some(3));
    let result = SyllableCountSim::new(vec![1, 2], &[1, 1], config)
        .unwrap()
        .run()
        .unwrap();

    let ci = result.max_syllables;
    assert!((ci.mean - 1.875).abs() < 3.0 * ci.half_width());

    let ratio = result.max_lengths[&2] as f64 / n_draws as f64;
    assert_relative_eq!(ratio, 0.875, epsilon = 0.02);
    assert_relative_eq!(result.over_threshold_ratio, ratio);
}

#[test]
fn grid_comparison_of_a_lexicon_with_itself() {
    let table = FeatureTable::from_tsv(TABLE).unwrap();
    let index = table.invert();
    let prosody = Prosody::new(&index).unwrap();
    let lexicon = Lexicon::from_transcriptions(LEXICON);
    let grids = prosody.x_grids(&lexicon, false).unwrap();

    let config = GridComparisonConfig::new().n_draws(200).seed(3);
    let result = GridComparison::new(&grids, &grids, config.clone())
        .unwrap()
        .run()
        .unwrap();
    let again = GridComparison::new(&grids, &grids, config)
        .unwrap()
        .run()
        .unwrap();

    assert_eq!(result.n_draws, 200);
    assert_eq!(result.sample_size, LEXICON.len());
    assert!(result.n_same_inventory <= 200);
    assert_eq!(result.type_counts.values().sum::<usize>(), 200 * LEXICON.len());
    assert_eq!(result.type_counts, again.type_counts);
}

const IDENTICAL: &str = indoc!(
    "
    \tsyll\tcons\tnasal
    p\t-\t+\t-
    b\t-\t+\t-
    m\t-\t+\t+
    a\t+\t-\t0
    "
);

#[test]
fn indistinguishable_segments_are_flagged_in_reports() {
    let table = FeatureTable::from_tsv(IDENTICAL).unwrap();
    assert!(!table.is_well_formed());
    let index = table.invert();
    let classes = ClassTable::from_feature_table(&table);

    let lexicon =
        Lexicon::from_transcriptions(["p a m", "b a", "m a p", "a b"]);
    let sublexicon = Lexicon::from_transcriptions(["a m", "m a"]);
    let config = SimulationConfig::new().n_draws(100).seed(5);
    let result = MonteCarloSimulator::new(
        &index,
        &classes,
        &lexicon,
        &sublexicon,
        config,
    )
    .unwrap()
    .run()
    .unwrap();

    let mut flagged: Vec<&str> = result
        .absent_classes
        .iter()
        .filter(|class| !class.reliable)
        .map(|class| class.segments.as_str())
        .collect();
    flagged.sort_unstable();
    assert_eq!(flagged, vec!["b", "p"]);

    // -nasal picks out p and b together, so that class is sound
    let stops = result
        .absent_classes
        .iter()
        .find(|class| class.segments == "b,p")
        .unwrap();
    assert!(stops.reliable);

    let text = report(&result, OutputFormat::Text);
    let ambiguous: Vec<&str> = text
        .lines()
        .filter(|line| line.starts_with("absent."))
        .filter(|line| line.ends_with("\tambiguous"))
        .collect();
    assert_eq!(ambiguous.len(), 2);
    let json = report(&result, OutputFormat::Json);
    assert!(json.contains("\"reliable\": false"));
}
