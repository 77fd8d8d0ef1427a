use super::*;

fn small() -> Config {
    Config {
        population_size: 6,
        max_generations: 3,
        scenario: Scenario {
            duration: 1.0,
            ..Scenario::default()
        },
        ..Config::default()
    }
}

#[test]
fn runs_every_generation() {
    let solution = evolve_unobserved(&small()).unwrap();

    assert_eq!(solution.status, Status::MaxGenerations);
    assert_eq!(solution.generations, 3);
    assert_eq!(solution.history.len(), 4);
    assert_eq!(solution.population.len(), 6);
    assert_eq!(Some(&solution.best), fittest(&solution.population));
}

#[test]
fn same_seed_gives_same_result() {
    let a = evolve_unobserved(&small()).unwrap();
    let b = evolve_unobserved(&small()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn best_fitness_never_gets_worse() {
    let solution = evolve_unobserved(&small()).unwrap();
    for pair in solution.history.windows(2) {
        assert!(pair[1].best >= pair[0].best);
    }
}

#[test]
fn seed_design_starts_in_the_population() {
    let config = Config {
        max_generations: 0,
        ..small()
    };
    let solution = evolve_unobserved(&config).unwrap();

    assert_eq!(solution.generations, 0);
    assert_eq!(
        solution.population[0].genome,
        Genome::from_design(&Design::default())
    );
    assert!(solution.population[0].fitness.is_feasible());
}

#[test]
fn lone_elite_stagnates() {
    let config = Config {
        population_size: 1,
        stagnation_limit: 2,
        max_generations: 10,
        ..small()
    };
    let solution = evolve_unobserved(&config).unwrap();

    assert_eq!(solution.status, Status::Stagnated);
    assert_eq!(solution.generations, 2);
}

#[test]
fn observer_can_stop_early() {
    let mut seen = Vec::new();
    let solution = evolve(&small(), |event: &Generation| {
        seen.push(event.generation);
        (event.generation == 1).then_some(Action::StopEarly)
    })
    .unwrap();

    assert_eq!(solution.status, Status::StoppedByObserver);
    assert_eq!(solution.generations, 1);
    assert_eq!(seen, vec![0, 1]);
}

#[test]
fn invalid_config_is_rejected() {
    let config = Config {
        tournament_size: 0,
        ..small()
    };
    assert_eq!(
        evolve_unobserved(&config).unwrap_err(),
        Error::Config(ConfigError::TournamentSize)
    );
}
