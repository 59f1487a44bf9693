pub const RESUME_REPLY: &str = "I'd be happy to help with your resume! A strong resume should highlight your achievements with quantifiable results, use action verbs, and be tailored to each job application. Could you tell me more about your current role and what type of positions you're targeting?";

pub const INTERVIEW_REPLY: &str = "Interview preparation is crucial! I recommend the STAR method (Situation, Task, Action, Result) for behavioral questions. What type of interview are you preparing for, and what role?";

pub const CAREER_CHANGE_REPLY: &str = "Career transitions can be exciting! The key is identifying transferable skills and building a compelling narrative. What field are you interested in moving to, and what's driving this change?";

pub const SKILLS_REPLY: &str = "Continuous learning is essential for career growth. Based on current market trends, technical skills like data analysis, cloud computing, and AI are in high demand. What areas are you interested in developing?";

pub const SALARY_REPLY: &str = "Salary negotiation is an important skill. Research market rates for your role and location, document your achievements, and be prepared to discuss your value. What's your current situation?";

pub const GOAL_REPLY: &str = "Setting clear career goals is vital for success. I recommend using the SMART framework (Specific, Measurable, Achievable, Relevant, Time-bound). What are you hoping to achieve in your career?";

pub const FALLBACK_REPLY: &str = "I'm here to help you with career guidance! Based on your profile, I can assist with resume reviews, interview preparation, career planning, skill development, and more. How can I support your career journey today?";
