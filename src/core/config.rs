use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub stopping: bool,
    pub stemming: bool,

    pub interval: usize,            // fragments per child index
    pub max_ranked_results: usize,  // K for ranked queries
    pub parallelism: usize,         // worker tasks per source build

    pub child_index_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            stopping: true,
            stemming: true,
            interval: 10,
            max_ranked_results: 150,
            parallelism: num_cpus::get(),
            child_index_dir: PathBuf::from("./index/child"),
        }
    }
}
