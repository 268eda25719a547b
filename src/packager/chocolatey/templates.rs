//! Default Chocolatey templates.

use crate::packager::prepare::EmbeddedTemplate;

const NUSPEC: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2015/06/nuspec.xsd">
  <metadata>
    <id>{{chocolateyPackageName}}</id>
    <version>{{chocolateyPackageVersion}}</version>
    <packageSourceUrl>{{chocolateyPackageSourceUrl}}</packageSourceUrl>
    <owners>{{chocolateyUsername}}</owners>
    <title>{{chocolateyTitle}}</title>
    <authors>{{projectAuthorsByComma}}</authors>
    <projectUrl>{{projectWebsite}}</projectUrl>
    <iconUrl>{{chocolateyIconUrl}}</iconUrl>
{{#if projectLicenseUrl}}
    <licenseUrl>{{projectLicenseUrl}}</licenseUrl>
{{/if}}
    <requireLicenseAcceptance>false</requireLicenseAcceptance>
    <projectSourceUrl>{{repoUrl}}</projectSourceUrl>
    <docsUrl>{{projectWebsite}}</docsUrl>
    <bugTrackerUrl>{{repoUrl}}/issues</bugTrackerUrl>
    <tags>{{distributionName}}</tags>
    <summary>{{projectDescription}}</summary>
    <description>{{projectDescription}}</description>
    <releaseNotes>{{repoUrl}}/releases/tag/{{tagName}}</releaseNotes>
  </metadata>
  <files>
    <file src="tools\**" target="tools" />
  </files>
</package>
"#;

const INSTALL: &str = r#"$ErrorActionPreference = 'Stop'
$toolsDir = "$(Split-Path -parent $MyInvocation.MyCommand.Definition)"

$packageArgs = @{
  packageName    = '{{chocolateyPackageName}}'
  unzipLocation  = $toolsDir
  url64bit       = '{{distributionUrl}}'
  checksum64     = '{{distributionChecksumSha256}}'
  checksumType64 = 'sha256'
}

Install-ChocolateyZipPackage @packageArgs

Install-BinFile -Name '{{distributionExecutable}}' -Path (Join-Path $toolsDir '{{distributionExecutable}}.exe')
"#;

const UNINSTALL: &str = r#"$ErrorActionPreference = 'Stop'

Uninstall-BinFile -Name '{{distributionExecutable}}'
Uninstall-ChocolateyZipPackage '{{chocolateyPackageName}}' '{{distributionArtifactFile}}'
"#;

const README: &str = r#"# {{chocolateyTitle}}

Chocolatey package for [{{projectName}}]({{repoUrl}}).

```
choco install {{chocolateyPackageName}}
```
"#;

const WORKFLOW: &str = r#"name: Publish {{chocolateyPackageName}}

on:
  push:
    branches: [ main ]

jobs:
  publish:
    runs-on: windows-latest
    steps:
      - uses: actions/checkout@v4

      - name: Pack
        working-directory: {{distributionName}}
        run: choco pack {{chocolateyPackageName}}.nuspec

      - name: Push
        working-directory: {{distributionName}}
        run: |
          choco apikey -k $\{{ secrets.CHOCOLATEY_API_KEY }} -source {{chocolateySource}}
          choco push (Get-ChildItem *.nupkg | Select-Object -First 1).Name -s {{chocolateySource}}
"#;

/// Templates used when no template directory is configured.
pub const DEFAULT_TEMPLATES: &[EmbeddedTemplate] = &[
    EmbeddedTemplate {
        path: ".github/workflows/publish.yml.tpl",
        content: WORKFLOW,
    },
    EmbeddedTemplate {
        path: "README.md.tpl",
        content: README,
    },
    EmbeddedTemplate {
        path: "binary.nuspec.tpl",
        content: NUSPEC,
    },
    EmbeddedTemplate {
        path: "tools/chocolateyinstall.ps1.tpl",
        content: INSTALL,
    },
    EmbeddedTemplate {
        path: "tools/chocolateyuninstall.ps1.tpl",
        content: UNINSTALL,
    },
];
