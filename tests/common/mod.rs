use dist_train_utils::SamplerConfig;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[allow(dead_code)]
pub fn sampler_config(
    dataset_len: usize,
    total_iter: usize,
    batch_size: usize,
    world_size: usize,
    rank: usize,
    seed: u64,
) -> SamplerConfig {
    SamplerConfig::new(dataset_len, total_iter, batch_size, world_size, rank)
        .unwrap()
        .with_seed(seed)
}
