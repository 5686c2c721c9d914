// src/db/seed.rs
//
// Sample catalog used on first launch, while the remote catalog is disabled.

use crate::domain::{Course, CourseLevel};
use crate::error::AppResult;
use crate::repositories::CourseRepository;

const IMAGE_BASE: &str = "https://images.unsplash.com";

/// Insert the sample catalog when the store holds no courses.
///
/// Returns the number of courses inserted (0 when the store was not empty).
pub fn populate_sample_catalog(repo: &dyn CourseRepository) -> AppResult<usize> {
    if repo.count()? > 0 {
        log::debug!("Catalog already populated, skipping seed");
        return Ok(0);
    }

    let courses = sample_catalog();
    repo.upsert_many(&courses)?;
    log::info!("Seeded {} sample courses", courses.len());
    Ok(courses.len())
}

/// The ten sample courses, ids 1 through 10
pub fn sample_catalog() -> Vec<Course> {
    vec![
        Course::new(
            1,
            "Android Development for Beginners",
            "Udemy",
            40,
            CourseLevel::Beginner,
            image("photo-1607252650355-f7fd0460ccdb"),
            "A complete introduction to Android: Java basics, XML layouts, activities, \
             fragments, local databases and building a polished UI. You finish with your \
             first published-quality app.",
        ),
        Course::new(
            2,
            "Kotlin for Android Developers",
            "Coursera",
            30,
            CourseLevel::Intermediate,
            image("photo-1461749280684-dccba630e2f6"),
            "Modern Kotlin for Android: syntax, coroutines, extension functions, lambdas \
             and other advanced language features, with hands-on exercises.",
        ),
        Course::new(
            3,
            "MVVM and Clean Architecture",
            "Udacity",
            25,
            CourseLevel::Advanced,
            image("photo-1516321318423-f06f85e504b3"),
            "A deep dive into application architecture: MVVM, Clean Architecture, \
             dependency injection, unit testing and production practices.",
        ),
        Course::new(
            4,
            "Jetpack Compose: Modern Android UI",
            "Google Codelabs",
            20,
            CourseLevel::Intermediate,
            image("photo-1498050108023-c5249f4df085"),
            "Build declarative UIs with Jetpack Compose: fundamentals, state management, \
             navigation and interop with existing apps.",
        ),
        Course::new(
            5,
            "Room Database and Data Persistence",
            "Udemy",
            15,
            CourseLevel::Beginner,
            image("photo-1544256718-3bcf237f3974"),
            "Everything about local storage with Room: entities, DAOs, migrations, \
             LiveData and Flow, with practical examples.",
        ),
        Course::new(
            6,
            "Retrofit 2 and REST APIs",
            "Pluralsight",
            18,
            CourseLevel::Intermediate,
            image("photo-1517694712202-14dd9538aa97"),
            "Networking with Retrofit: GET and POST requests, JSON parsing, headers, \
             authentication, error handling and coroutine integration.",
        ),
        Course::new(
            7,
            "Material Design in Android Apps",
            "Material.io",
            12,
            CourseLevel::Beginner,
            image("photo-1561070791-2526d30994b5"),
            "Design beautiful apps with Material Design 3: components, color schemes, \
             typography, motion and UX practices for mobile.",
        ),
        Course::new(
            8,
            "Unit Testing and UI Testing in Android",
            "Test Automation University",
            28,
            CourseLevel::Advanced,
            image("photo-1522071820081-009f0129c71c"),
            "Testing Android apps end to end: JUnit and Mockito unit tests, Espresso UI \
             tests, integration tests and test-driven development.",
        ),
        Course::new(
            9,
            "Firebase as an Android Backend",
            "Firebase",
            22,
            CourseLevel::Intermediate,
            image("photo-1551033406-611cf9a28f67"),
            "Use Firebase as the backend of your app: authentication, Firestore, cloud \
             storage, push notifications and analytics.",
        ),
        Course::new(
            10,
            "Publishing to Google Play",
            "Google Play Academy",
            10,
            CourseLevel::Beginner,
            image("photo-1512941937669-90a1b58e7e9c"),
            "Step by step release: release builds, app bundles, store listing, beta \
             tracks, store optimisation and promotion.",
        ),
    ]
}

fn image(photo: &str) -> String {
    format!("{}/{}?auto=format&fit=crop&w=800&q=80", IMAGE_BASE, photo)
}
