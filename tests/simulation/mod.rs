macro_rules! setup {
    () => {
        let _ = env_logger::builder().is_test(true).try_init();
    };
}

mod end_to_end;
mod properties;
mod traces;
