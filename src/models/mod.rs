pub mod profile;
pub mod user;

pub use profile::{
    Education, EducationList, Experience, ExperienceList, NewProfile, Profile, ProfileChanges,
    ProfileView, SocialLinks,
};
pub use user::UserSummary;
