#[cfg(test)]
mod tests {
    use silo_core::Client;
    use silo_memory::MemoryDriver;
    use silo_tests::{execute_tests, init_logs};

    #[tokio::test]
    async fn memory() {
        init_logs();
        let driver = MemoryDriver::connect("memory://").expect("Could not open the store");
        execute_tests(Client::new(driver)).await;
    }
}
