// Storage integration tests
