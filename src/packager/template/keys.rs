//! Template variable names.

pub const PROJECT_NAME: &str = "projectName";
pub const PROJECT_VERSION: &str = "projectVersion";
pub const PROJECT_DESCRIPTION: &str = "projectDescription";
pub const PROJECT_LICENSE: &str = "projectLicense";
pub const PROJECT_LICENSE_URL: &str = "projectLicenseUrl";
pub const PROJECT_WEBSITE: &str = "projectWebsite";
pub const PROJECT_AUTHORS_BY_SPACE: &str = "projectAuthorsBySpace";
pub const PROJECT_AUTHORS_BY_COMMA: &str = "projectAuthorsByComma";

pub const TAG_NAME: &str = "tagName";
pub const REPO_OWNER: &str = "repoOwner";
pub const REPO_NAME: &str = "repoName";
pub const REPO_URL: &str = "repoUrl";

pub const DISTRIBUTION_NAME: &str = "distributionName";
pub const DISTRIBUTION_EXECUTABLE: &str = "distributionExecutable";
pub const DISTRIBUTION_MAIN_CLASS: &str = "distributionMainClass";
pub const DISTRIBUTION_MAIN_MODULE: &str = "distributionMainModule";
pub const DISTRIBUTION_PACKAGE_DIRECTORY: &str = "distributionPackageDirectory";
pub const DISTRIBUTION_URL: &str = "distributionUrl";
pub const DISTRIBUTION_ARTIFACT_FILE: &str = "distributionArtifactFile";
pub const DISTRIBUTION_CHECKSUM_SHA256: &str = "distributionChecksumSha256";

pub const CHOCOLATEY_PACKAGE_NAME: &str = "chocolateyPackageName";
pub const CHOCOLATEY_PACKAGE_VERSION: &str = "chocolateyPackageVersion";
pub const CHOCOLATEY_TITLE: &str = "chocolateyTitle";
pub const CHOCOLATEY_USERNAME: &str = "chocolateyUsername";
pub const CHOCOLATEY_ICON_URL: &str = "chocolateyIconUrl";
pub const CHOCOLATEY_SOURCE: &str = "chocolateySource";
pub const CHOCOLATEY_BUCKET_REPO_URL: &str = "chocolateyBucketRepoUrl";
pub const CHOCOLATEY_BUCKET_REPO_CLONE_URL: &str = "chocolateyBucketRepoCloneUrl";
pub const CHOCOLATEY_PACKAGE_SOURCE_URL: &str = "chocolateyPackageSourceUrl";
pub const CHOCOLATEY_REPOSITORY_URL: &str = "chocolateyRepositoryUrl";
pub const CHOCOLATEY_REPOSITORY_CLONE_URL: &str = "chocolateyRepositoryCloneUrl";
