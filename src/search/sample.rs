//! Synthetic corpus used to bootstrap an empty store.

use crate::core::JobRecord;

struct SampleJob {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    location: &'static str,
    salary: &'static str,
    experience: &'static str,
    education: &'static str,
    description: &'static str,
    requirements: &'static [&'static str],
    benefits: &'static [&'static str],
    industry: &'static str,
    company_size: &'static str,
}

const SAMPLE_JOBS: &[SampleJob] = &[
    SampleJob {
        id: "sample-001",
        title: "高级 前端 工程师",
        company: "星河科技",
        location: "北京",
        salary: "25k-40k",
        experience: "3-5年",
        education: "本科",
        description: "负责 前端 架构设计 与 React 组件库 建设",
        requirements: &["React", "TypeScript", "Webpack", "前端"],
        benefits: &["五险一金", "弹性工作"],
        industry: "互联网",
        company_size: "2000人以上",
    },
    SampleJob {
        id: "sample-002",
        title: "Frontend Engineer",
        company: "Nimbus Labs",
        location: "Shanghai",
        salary: "20k-30k",
        experience: "2-4 years",
        education: "Bachelor",
        description: "Build responsive web applications with React and modern tooling",
        requirements: &["React", "JavaScript", "CSS"],
        benefits: &["Remote Fridays", "Stock options"],
        industry: "SaaS",
        company_size: "150-500人",
    },
    SampleJob {
        id: "sample-003",
        title: "前端 开发 工程师 Vue",
        company: "星河科技",
        location: "北京",
        salary: "18k-28k",
        experience: "1-3年",
        education: "大专",
        description: "参与 前端 页面 开发 与 性能 优化",
        requirements: &["Vue", "JavaScript", "前端"],
        benefits: &["年终奖"],
        industry: "互联网",
        company_size: "2000人以上",
    },
    SampleJob {
        id: "sample-004",
        title: "Java 后端 开发",
        company: "蓝海金融",
        location: "上海",
        salary: "20k-35k",
        experience: "3-5年",
        education: "本科",
        description: "负责 交易 系统 后端 服务 开发 与 维护",
        requirements: &["Java", "Spring", "MySQL", "Redis"],
        benefits: &["六险一金", "餐补"],
        industry: "金融",
        company_size: "500-2000人",
    },
    SampleJob {
        id: "sample-005",
        title: "Rust Systems Engineer",
        company: "Ferrous Data",
        location: "Remote",
        salary: "35k-55k",
        experience: "5+ years",
        education: "Master",
        description: "Design storage engines and async network services in Rust",
        requirements: &["Rust", "Tokio", "Linux", "Distributed systems"],
        benefits: &["Fully remote", "Conference budget"],
        industry: "Infrastructure",
        company_size: "50-150人",
    },
    SampleJob {
        id: "sample-006",
        title: "数据 分析师",
        company: "蓝海金融",
        location: "上海",
        salary: "15k-25k",
        experience: "1-3年",
        education: "本科",
        description: "通过 SQL 与 Python 进行 业务 数据 分析 与 报表 建设",
        requirements: &["SQL", "Python", "Tableau"],
        benefits: &["五险一金"],
        industry: "金融",
        company_size: "500-2000人",
    },
    SampleJob {
        id: "sample-007",
        title: "Machine Learning Engineer",
        company: "Nimbus Labs",
        location: "Shanghai",
        salary: "30k-50k",
        experience: "3-5 years",
        education: "Master",
        description: "Train and deploy ranking models for recommendation systems",
        requirements: &["Python", "PyTorch", "Learning to rank", "Spark"],
        benefits: &["Stock options", "GPU cluster"],
        industry: "SaaS",
        company_size: "150-500人",
    },
    SampleJob {
        id: "sample-008",
        title: "全栈 工程师",
        company: "星河科技",
        location: "深圳",
        salary: "22k-35k",
        experience: "3-5年",
        education: "本科",
        description: "负责 前端 React 与 Node 服务端 全栈 开发",
        requirements: &["React", "Node.js", "MongoDB", "前端"],
        benefits: &["弹性工作", "股票期权"],
        industry: "互联网",
        company_size: "2000人以上",
    },
    SampleJob {
        id: "sample-009",
        title: "DevOps Engineer",
        company: "Ferrous Data",
        location: "Remote",
        salary: "25k-40k",
        experience: "3-5 years",
        education: "Bachelor",
        description: "Operate Kubernetes clusters and CI pipelines",
        requirements: &["Kubernetes", "Docker", "Terraform", "Linux"],
        benefits: &["Fully remote"],
        industry: "Infrastructure",
        company_size: "50-150人",
    },
    SampleJob {
        id: "sample-010",
        title: "产品 经理",
        company: "云帆教育",
        location: "杭州",
        salary: "18k-30k",
        experience: "3-5年",
        education: "本科",
        description: "负责 在线 教育 产品 规划 与 需求 分析",
        requirements: &["产品设计", "Axure", "数据分析"],
        benefits: &["带薪年假"],
        industry: "教育",
        company_size: "150-500人",
    },
    SampleJob {
        id: "sample-011",
        title: "React Native 移动端 开发",
        company: "云帆教育",
        location: "杭州",
        salary: "20k-32k",
        experience: "2-4年",
        education: "本科",
        description: "使用 React Native 开发 跨平台 移动 应用",
        requirements: &["React Native", "React", "iOS", "Android"],
        benefits: &["弹性工作"],
        industry: "教育",
        company_size: "150-500人",
    },
    SampleJob {
        id: "sample-012",
        title: "Go Backend Developer",
        company: "Nimbus Labs",
        location: "Beijing",
        salary: "25k-45k",
        experience: "3-6 years",
        education: "Bachelor",
        description: "Build high throughput APIs and message pipelines in Go",
        requirements: &["Go", "gRPC", "Kafka", "PostgreSQL"],
        benefits: &["Stock options"],
        industry: "SaaS",
        company_size: "150-500人",
    },
];

/// The bootstrap corpus as job records, in a fixed order.
pub fn sample_jobs() -> Vec<JobRecord> {
    SAMPLE_JOBS
        .iter()
        .map(|sample| JobRecord {
            id: sample.id.to_string(),
            title: sample.title.to_string(),
            company: sample.company.to_string(),
            location: sample.location.to_string(),
            salary: sample.salary.to_string(),
            experience: sample.experience.to_string(),
            education: sample.education.to_string(),
            description: sample.description.to_string(),
            requirements: sample.requirements.iter().map(|s| (*s).to_string()).collect(),
            benefits: sample.benefits.iter().map(|s| (*s).to_string()).collect(),
            publish_time: "2024-01-01".to_string(),
            source: "sample".to_string(),
            industry: sample.industry.to_string(),
            company_size: sample.company_size.to_string(),
        })
        .collect()
}
