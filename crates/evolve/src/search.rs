use cadence_core::Observer;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::{
    Action, Config, ConfigError, Error, Generation, Genome, Individual, Scenario, Solution,
    Statistics, Status, evaluate,
    population::{Mutation, combine, fittest, select},
    stagnation::Stagnation,
};

pub(super) fn search<Obs>(config: &Config, mut observer: Obs) -> Result<Solution, Error>
where
    Obs: Observer<Generation, Action>,
{
    config.validate()?;
    let mutation = Mutation::new(config.mutation_rate, config.mutation_scale)
        .ok_or(ConfigError::MutationScale(config.mutation_scale))?;

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut stagnation = Stagnation::new(config.stagnation_limit);
    let mut history = Vec::with_capacity(config.max_generations + 1);

    let mut population: Vec<Individual> = (0..config.population_size)
        .map(|_| Individual::unevaluated(Genome::random(&mut rng)))
        .collect();
    if let (Some(design), Some(first)) = (&config.seed_design, population.first_mut()) {
        first.genome = Genome::from_design(design);
    }
    evaluate_all(&mut population, &config.scenario)?;

    let mut generation = 0;
    loop {
        let (Some(statistics), Some(&best)) = (Statistics::of(&population), fittest(&population))
        else {
            return Err(ConfigError::PopulationSize.into());
        };

        let stagnated = stagnation.update(statistics.best);
        history.push(statistics);

        debug!(
            generation,
            best = statistics.best.objective,
            average = statistics.average.objective,
            "generation evaluated"
        );

        let event = Generation {
            generation,
            statistics,
            best,
            stagnant_for: stagnation.count(),
        };

        let status = if let Some(Action::StopEarly) = observer.observe(&event) {
            Some(Status::StoppedByObserver)
        } else if stagnated {
            Some(Status::Stagnated)
        } else if generation == config.max_generations {
            Some(Status::MaxGenerations)
        } else {
            None
        };

        if let Some(status) = status {
            info!(?status, generation, objective = best.fitness.objective, "search finished");
            return Ok(Solution {
                status,
                best,
                population,
                history,
                generations: generation,
            });
        }

        let mut children: Vec<Individual> = select(&population, config.tournament_size, &mut rng)
            .iter()
            .map(|parent| Individual::unevaluated(mutation.apply(&parent.genome, &mut rng)))
            .collect();
        evaluate_all(&mut children, &config.scenario)?;

        population = combine(&population, children);
        generation += 1;
    }
}

fn evaluate_all(population: &mut [Individual], scenario: &Scenario) -> Result<(), Error> {
    for individual in population {
        individual.fitness = evaluate(&individual.genome, scenario)?.fitness;
    }
    Ok(())
}
