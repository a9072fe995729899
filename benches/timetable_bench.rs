//! Criterion benchmarks for u-timetable.
//!
//! Uses synthetic instances: `n` courses with overlapping enrolments,
//! a mix of lecture rooms and PC labs, and four start slots per day over
//! two weeks.

use chrono::{NaiveDate, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_timetable::ga::{
    FitnessConfig, FitnessEvaluator, GaConfig, GaRunner, IdGenerator, Initializer,
};
use u_timetable::models::{
    Classroom, Course, EntitySet, Invigilator, SchedulingWindow, Student, Timeslot,
};
use u_timetable::random::create_rng;

// ===========================================================================
// Synthetic instance
// ===========================================================================

fn instance(courses: usize) -> EntitySet {
    let mut rng = create_rng(7);
    let student_count = courses * 6;
    let students: Vec<Student> = (0..student_count)
        .map(|i| Student::new(format!("s{i}")))
        .collect();

    let course_list: Vec<Course> = (0..courses)
        .map(|c| {
            let size = rng.random_range(5..30);
            let enrolled: Vec<String> = (0..size)
                .map(|_| format!("s{}", rng.random_range(0..student_count)))
                .collect::<std::collections::BTreeSet<_>>()
                .into_iter()
                .collect();
            Course::new(format!("C{c}"), [60, 90, 120][c % 3])
                .with_students(enrolled)
                .with_prep(10, 10)
                .with_pc_lab(c % 7 == 0)
        })
        .collect();

    let mut classrooms: Vec<Classroom> = (0..courses / 4 + 2)
        .map(|r| Classroom::new(format!("R{r}"), [20, 30, 40][r % 3]))
        .collect();
    classrooms.push(Classroom::new("LAB1", 30).with_pc_lab(true));
    classrooms.push(Classroom::new("LAB2", 30).with_pc_lab(true));

    let invigilators: Vec<Invigilator> = (0..courses / 3 + 2)
        .map(|i| Invigilator::new(format!("I{i}"), 6))
        .collect();

    let first = NaiveDate::from_ymd_opt(2025, 1, 6).expect("date");
    let window = SchedulingWindow::new(
        first,
        first + TimeDelta::days(14),
        chrono::NaiveTime::from_hms_opt(8, 0, 0).expect("time"),
        chrono::NaiveTime::from_hms_opt(20, 0, 0).expect("time"),
    )
    .expect("window");

    let timeslots: Vec<Timeslot> = (0..14)
        .map(|d| first + TimeDelta::days(d))
        .filter(|day| window.is_open_on(*day))
        .flat_map(|day| {
            [8, 11, 14, 17].into_iter().map(move |h| {
                let start = day.and_hms_opt(h, 0, 0).expect("time");
                Timeslot::starting_at(start, 180).expect("slot")
            })
        })
        .collect();

    EntitySet::new(course_list, students, classrooms, invigilators, timeslots, window)
        .expect("valid instance")
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("fitness_evaluation");

    for courses in [20usize, 80, 200] {
        let set = instance(courses);
        let config = FitnessConfig::default();
        let mut rng = create_rng(42);
        let population = Initializer::new(&set)
            .expect("initializer")
            .population(50, &mut IdGenerator::default(), &mut rng)
            .expect("population");

        group.bench_with_input(
            BenchmarkId::from_parameter(courses),
            &(set, config, population),
            |b, (s, cfg, pop)| {
                let evaluator = FitnessEvaluator::new(s, cfg);
                b.iter(|| {
                    let mut pop = pop.clone();
                    let cards = evaluator.score_population(black_box(&mut pop), true, true);
                    black_box(cards)
                })
            },
        );
    }
    group.finish();
}

fn bench_ga_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("ga_run");
    group.sample_size(10);

    for (courses, pop, gen) in [(20usize, 30usize, 50usize), (80, 50, 30)] {
        let set = instance(courses);
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("c{}_p{}_g{}", courses, pop, gen), courses),
            &(set, config),
            |b, (s, c)| {
                b.iter(|| {
                    let result = GaRunner::run(black_box(s), black_box(c));
                    black_box(result)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_ga_run);
criterion_main!(benches);
