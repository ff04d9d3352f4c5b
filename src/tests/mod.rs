mod once_tests;
